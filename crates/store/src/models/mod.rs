mod content;
mod image;
mod version;

pub(crate) use self::content::ContentRow;
pub(crate) use self::image::LayoutImageRow;
pub(crate) use self::version::VersionRow;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use time::{Date, UtcDateTime};

/// Dates are persisted as the Unix timestamp of midnight UTC.
pub(crate) fn date_to_row(date: Date) -> i64 {
    date.midnight().as_utc().unix_timestamp()
}

pub(crate) fn date_from_row(timestamp: i64, field: &'static str) -> Result<Date> {
    Ok(UtcDateTime::from_unix_timestamp(timestamp).or_raise(|| ErrorKind::InvalidData(field))?.date())
}

pub(crate) fn datetime_from_row(timestamp: i64, field: &'static str) -> Result<UtcDateTime> {
    UtcDateTime::from_unix_timestamp(timestamp).or_raise(|| ErrorKind::InvalidData(field))
}
