//! UI strings used by the interactive widgets (likes, comments, stats,
//! newsletter) that the static pages hydrate on the client.
//!
//! Lookups go through [`MessageKey`]; each locale's table is a `match` so a
//! missing Spanish entry is a compile error. English may omit entries that are
//! identical to Spanish, in which case the default locale answers.

use std::collections::BTreeMap;

use serde::Serialize;

use super::locale::Locale;

macro_rules! message_keys {
    ($($variant:ident => $key:literal,)+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum MessageKey {
            $($variant,)+
        }

        impl MessageKey {
            pub const ALL: &'static [MessageKey] = &[$(MessageKey::$variant,)+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(MessageKey::$variant => $key,)+
                }
            }
        }
    };
}

message_keys! {
    NavHome => "nav.home",
    NavArchive => "nav.archive",
    NavAbout => "nav.about",
    NavSearch => "nav.search",
    NavSubscribe => "nav.subscribe",
    NavLangToggle => "nav.langToggle",
    PostLike => "post.like",
    PostComments => "post.comments",
    PostShare => "post.share",
    PostCopyLink => "post.copyLink",
    PostCopied => "post.copied",
    PostShareArticle => "post.shareArticle",
    PostCommentsCount => "post.commentsCount",
    LoadingStats => "loading.stats",
    StatsViews => "stats.views",
    StatsMostRead => "stats.mostRead",
    StatsMostViewed => "stats.mostViewed",
    StatsErrorLoading => "stats.errorLoading",
    CommentsTitle => "comments.title",
    CommentsName => "comments.name",
    CommentsPlaceholder => "comments.placeholder",
    CommentsSubmit => "comments.submit",
    CommentsSending => "comments.sending",
    CommentsLoading => "comments.loading",
    CommentsNoComments => "comments.noComments",
    CommentsError => "comments.error",
    CommentsErrorSubmit => "comments.errorSubmit",
    CommentsSuccess => "comments.success",
    ModalClose => "modal.close",
    DateToday => "date.today",
    DateYesterday => "date.yesterday",
    DateDaysAgo => "date.daysAgo",
    DateWeek => "date.week",
    SearchTitle => "search.title",
    SearchPlaceholder => "search.placeholder",
    SearchTyping => "search.typing",
    SearchNoResults => "search.noResults",
    SearchClose => "search.close",
    SubscribeTitle => "subscribe.title",
    SubscribeDescription => "subscribe.description",
    SubscribePlaceholder => "subscribe.placeholder",
    SubscribeButton => "subscribe.button",
    SubscribeSuccess => "subscribe.success",
    SubscribeError => "subscribe.error",
    SubscribeInvalid => "subscribe.invalid",
    SubscribeClose => "subscribe.close",
}

fn spanish(key: MessageKey) -> &'static str {
    use MessageKey::*;
    match key {
        NavHome => "Inicio",
        NavArchive => "Archivo",
        NavAbout => "Sobre mí",
        NavSearch => "Buscar",
        NavSubscribe => "Suscribirse",
        NavLangToggle => "Cambiar idioma",
        PostLike => "Me gusta",
        PostComments => "Comentarios",
        PostShare => "Compartir",
        PostCopyLink => "Copiar enlace",
        PostCopied => "✓",
        PostShareArticle => "Compartir artículo",
        PostCommentsCount => "comentarios",
        LoadingStats => "Cargando estadísticas...",
        StatsViews => "vistas",
        StatsMostRead => "Más leídos",
        StatsMostViewed => "Más vistos",
        StatsErrorLoading => "No se pudieron cargar los posts populares",
        CommentsTitle => "Comentarios",
        CommentsName => "Tu nombre",
        CommentsPlaceholder => "Escribe un comentario...",
        CommentsSubmit => "Enviar",
        CommentsSending => "Enviando...",
        CommentsLoading => "Cargando...",
        CommentsNoComments => "Sé el primero en comentar",
        CommentsError => "Error al cargar comentarios",
        CommentsErrorSubmit => "Error al enviar comentario",
        CommentsSuccess => "Comentario enviado",
        ModalClose => "Cerrar",
        DateToday => "Hoy",
        DateYesterday => "Ayer",
        DateDaysAgo => "d",
        DateWeek => "sem",
        SearchTitle => "Buscar",
        SearchPlaceholder => "Buscar artículos...",
        SearchTyping => "Escribe para buscar...",
        SearchNoResults => "No se encontraron resultados",
        SearchClose => "Cerrar búsqueda",
        SubscribeTitle => "Suscríbete al newsletter",
        SubscribeDescription => "Recibe los últimos artículos directamente en tu correo.",
        SubscribePlaceholder => "tu@email.com",
        SubscribeButton => "Suscribirse",
        SubscribeSuccess => "¡Gracias por suscribirte!",
        SubscribeError => "Error al suscribirse. Intenta de nuevo.",
        SubscribeInvalid => "Por favor ingresa un email válido",
        SubscribeClose => "Cerrar suscripción",
    }
}

fn english(key: MessageKey) -> Option<&'static str> {
    use MessageKey::*;
    let text = match key {
        NavHome => "Home",
        NavArchive => "Archive",
        NavAbout => "About",
        NavSearch => "Search",
        NavSubscribe => "Subscribe",
        NavLangToggle => "Change language",
        PostLike => "Like",
        PostComments => "Comments",
        PostShare => "Share",
        PostCopyLink => "Copy link",
        PostShareArticle => "Share article",
        PostCommentsCount => "comments",
        LoadingStats => "Loading stats...",
        StatsViews => "views",
        StatsMostRead => "Most Read",
        StatsMostViewed => "Most viewed",
        StatsErrorLoading => "Could not load popular posts",
        CommentsTitle => "Comments",
        CommentsName => "Your name",
        CommentsPlaceholder => "Write a comment...",
        CommentsSubmit => "Submit",
        CommentsSending => "Sending...",
        CommentsLoading => "Loading...",
        CommentsNoComments => "Be the first to comment",
        CommentsError => "Error loading comments",
        CommentsErrorSubmit => "Error submitting comment",
        CommentsSuccess => "Comment submitted",
        ModalClose => "Close",
        DateToday => "Today",
        DateYesterday => "Yesterday",
        DateWeek => "w",
        SearchTitle => "Search",
        SearchPlaceholder => "Search articles...",
        SearchTyping => "Type to search...",
        SearchNoResults => "No results found",
        SearchClose => "Close search",
        SubscribeTitle => "Subscribe to newsletter",
        SubscribeDescription => "Get the latest articles directly in your inbox.",
        SubscribePlaceholder => "your@email.com",
        SubscribeButton => "Subscribe",
        SubscribeSuccess => "Thanks for subscribing!",
        SubscribeError => "Error subscribing. Please try again.",
        SubscribeInvalid => "Please enter a valid email",
        SubscribeClose => "Close subscription",
        PostCopied | DateDaysAgo => return None,
    };
    Some(text)
}

fn entry(locale: Locale, key: MessageKey) -> Option<&'static str> {
    match locale {
        Locale::Es => Some(spanish(key)),
        Locale::En => english(key),
    }
}

/// Requested locale, then the default locale.
pub fn translate(locale: Locale, key: MessageKey) -> &'static str {
    entry(locale, key).unwrap_or_else(|| spanish(key))
}

/// Complete table for one locale, ready to ship to the browser.
#[derive(Debug, Clone, Serialize)]
pub struct ClientDictionary {
    pub lang: Locale,
    pub name: &'static str,
    pub locale: &'static str,
    pub t: BTreeMap<&'static str, &'static str>,
}

impl ClientDictionary {
    pub fn for_locale(lang: Locale) -> Self {
        let t = MessageKey::ALL
            .iter()
            .map(|key| (key.as_str(), translate(lang, *key)))
            .collect();
        Self {
            lang,
            name: lang.display_name(),
            locale: lang.bcp47(),
            t,
        }
    }
}
