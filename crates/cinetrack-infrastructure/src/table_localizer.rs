//! Embedded translation tables.
//!
//! A static message catalog for the two supported languages with
//! `{name}`-style parameter interpolation. Swapping this for a real
//! translation backend only means implementing `Localizer` over its
//! catalogs; the core keeps speaking in message keys.

use cinetrack_core::locale::{Language, Localizer, MessageArgs, MessageKey};

pub struct TableLocalizer;

impl TableLocalizer {
    pub fn new() -> Self {
        Self
    }

    /// `(en, uk)` template pair for `key`.
    fn templates(key: MessageKey) -> (&'static str, &'static str) {
        use MessageKey::*;
        match key {
            ChooseLanguage => ("Choose your language", "Оберіть мову"),
            ChosenLanguage => (
                "Language set. Welcome to your movie watchlist!",
                "Мову обрано. Ласкаво просимо до вашого списку фільмів!",
            ),
            GetStarted => ("Get started", "Розпочати"),
            LanguageEn => ("English", "English"),
            LanguageUk => ("Українська", "Українська"),

            ShowMovies => ("Your movies:", "Ваші фільми:"),
            NoMovies => (
                "Your list is empty. Send a movie title to add one.",
                "Ваш список порожній. Надішліть назву фільму, щоб додати його.",
            ),
            ArrowLeft => ("<<", "<<"),
            ArrowRight => (">>", ">>"),
            PageIndicator => ("{current} / {total}", "{current} / {total}"),
            SortingRate => ("By rating", "За рейтингом"),
            SortingDate => ("By date added", "За датою додавання"),
            OrderAsc => ("Ascending", "За зростанням"),
            OrderDesc => ("Descending", "За спаданням"),
            LastAdded => ("Last added", "Останні додані"),
            FirstAdded => ("First added", "Перші додані"),

            ChooseMovieToAdd => ("Choose a movie to add:", "Оберіть фільм, щоб додати:"),
            NoMoviesFound => ("Nothing found", "Нічого не знайдено"),
            GoBack => ("Back", "Назад"),

            MovieTitle => ("Title:", "Назва:"),
            ReleaseDate => ("Release date:", "Дата виходу:"),
            Genres => ("Genres:", "Жанри:"),
            Tagline => ("Tagline:", "Слоган:"),
            Runtime => ("Runtime:", "Тривалість:"),
            Minutes => ("min", "хв"),
            Overview => ("Overview:", "Опис:"),
            Rating => ("Rating:", "Рейтинг:"),
            Adult => ("18+", "18+"),
            DeleteMovie => ("Delete movie", "Видалити фільм"),
            MovieIsWatched => ("Watched", "Переглянуто"),
            MovieNotWatched => ("Not watched", "Не переглянуто"),

            LeaveReview => (
                "Would you like to leave a review?",
                "Бажаєте залишити відгук?",
            ),
            Yes => ("Yes", "Так"),
            No => ("No", "Ні"),
            HowWouldRate => (
                "How would you rate this movie?",
                "Як би ви оцінили цей фільм?",
            ),
            WriteReview => ("Write your review:", "Напишіть ваш відгук:"),

            ChooseGenre => ("Choose genres:", "Оберіть жанри:"),
            GenreLimitReached => (
                "You can pick at most {max} genres",
                "Можна обрати щонайбільше {max} жанрів",
            ),
            ConfirmGenres => ("Show movies", "Показати фільми"),
            FoundMovies => ("Found movies:", "Знайдені фільми:"),

            StoreUnavailableNotice => (
                "Storage is temporarily unavailable, please try again",
                "Сховище тимчасово недоступне, спробуйте ще раз",
            ),
            LoaderFailedNotice => (
                "Could not load fresh data, showing a limited view",
                "Не вдалося завантажити дані, показано обмежений вигляд",
            ),
            InvalidRating => (
                "Please send a rating between 1 and 10",
                "Будь ласка, надішліть оцінку від 1 до 10",
            ),
            EmptyGenreSelection => (
                "Pick at least one genre first",
                "Спершу оберіть хоча б один жанр",
            ),
        }
    }
}

impl Default for TableLocalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Localizer for TableLocalizer {
    fn format(&self, language: Language, key: MessageKey, args: MessageArgs<'_>) -> String {
        let (en, uk) = Self::templates(key);
        let template = match language {
            Language::En => en,
            Language::Uk => uk,
        };
        let mut message = template.to_string();
        for (name, value) in args {
            message = message.replace(&format!("{{{}}}", name), value);
        }
        message
    }
}
