use crate::application::dto::{WireDocument, WireGeoPoint, WireMedia, WirePhoto, WireWebPage};

/// How complete a media payload is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCheckResult {
    /// Build an ordinary message.
    Good,
    /// The payload needs a newer client.
    Unsupported,
    /// A mandatory part is missing.
    Empty,
    /// Self-destructing media.
    HasTimeToLive,
}

impl std::fmt::Display for MediaCheckResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Good => "good",
            Self::Unsupported => "unsupported",
            Self::Empty => "empty",
            Self::HasTimeToLive => "has ttl",
        };
        f.write_str(label)
    }
}

pub struct MediaCheckService;

impl MediaCheckService {
    /// Classifies a payload by its constructor and the presence of its body.
    #[must_use]
    pub const fn check(media: &WireMedia) -> MediaCheckResult {
        match media {
            WireMedia::MessageMediaEmpty
            | WireMedia::MessageMediaContact { .. }
            | WireMedia::MessageMediaGame { .. }
            | WireMedia::MessageMediaInvoice { .. }
            | WireMedia::MessageMediaPoll { .. }
            | WireMedia::Unknown => MediaCheckResult::Good,
            WireMedia::MessageMediaGeo { geo }
            | WireMedia::MessageMediaVenue { geo, .. }
            | WireMedia::MessageMediaGeoLive { geo, .. } => match geo {
                WireGeoPoint::GeoPoint { .. } => MediaCheckResult::Good,
                WireGeoPoint::GeoPointEmpty => MediaCheckResult::Empty,
            },
            WireMedia::MessageMediaPhoto { photo, ttl_seconds } => {
                if ttl_seconds.is_some() {
                    MediaCheckResult::HasTimeToLive
                } else {
                    match photo {
                        Some(WirePhoto::Photo { .. }) => MediaCheckResult::Good,
                        Some(WirePhoto::PhotoEmpty { .. }) | None => MediaCheckResult::Empty,
                    }
                }
            }
            WireMedia::MessageMediaDocument {
                document,
                ttl_seconds,
            } => {
                if ttl_seconds.is_some() {
                    MediaCheckResult::HasTimeToLive
                } else {
                    match document {
                        Some(WireDocument::Document { .. }) => MediaCheckResult::Good,
                        Some(WireDocument::DocumentEmpty { .. }) | None => MediaCheckResult::Empty,
                    }
                }
            }
            WireMedia::MessageMediaWebPage { webpage } => match webpage {
                WireWebPage::WebPage { .. }
                | WireWebPage::WebPageEmpty { .. }
                | WireWebPage::WebPagePending { .. } => MediaCheckResult::Good,
                WireWebPage::WebPageNotModified => MediaCheckResult::Unsupported,
            },
            WireMedia::MessageMediaUnsupported => MediaCheckResult::Unsupported,
        }
    }
}
