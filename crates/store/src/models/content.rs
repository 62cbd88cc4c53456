use crate::entity::{Content, NewContent};
use crate::error::{Error, ErrorKind};
use crate::models::{date_from_row, date_to_row, datetime_from_row};
use exn::{OptionExt, ResultExt};
use std::path::PathBuf;

#[derive(sqlx::FromRow)]
pub(crate) struct ContentRow {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) file_name: String,
    pub(crate) content_file: String,
    pub(crate) description: Option<String>,
    pub(crate) copyright_notes: Option<String>,
    pub(crate) rights_statement: Option<String>,
    pub(crate) additional_notes: Option<String>,
    pub(crate) published_date: Option<i64>,
    pub(crate) reviewed_on: Option<i64>,
    pub(crate) modified_on: i64,
    pub(crate) filesize: i64,
    pub(crate) active: bool,
    pub(crate) duplicatable: bool,
}
impl TryFrom<&NewContent> for ContentRow {
    type Error = Error;
    fn try_from(content: &NewContent) -> Result<Self, Self::Error> {
        Ok(Self {
            id: 0,
            title: content.title.clone(),
            file_name: content.file_name.clone(),
            content_file: content
                .content_file
                .to_str()
                .ok_or_raise(|| ErrorKind::InvalidData("content file"))?
                .to_string(),
            description: content.description.clone(),
            copyright_notes: content.copyright_notes.clone(),
            rights_statement: content.rights_statement.clone(),
            additional_notes: content.additional_notes.clone(),
            published_date: content.published_date.map(date_to_row),
            reviewed_on: content.reviewed_on.map(date_to_row),
            modified_on: time::UtcDateTime::now().unix_timestamp(),
            filesize: i64::try_from(content.filesize).or_raise(|| ErrorKind::InvalidData("filesize"))?,
            active: content.active,
            duplicatable: content.duplicatable,
        })
    }
}
impl TryFrom<ContentRow> for Content {
    type Error = Error;
    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            title: row.title,
            file_name: row.file_name,
            content_file: PathBuf::from(row.content_file),
            description: row.description,
            copyright_notes: row.copyright_notes,
            rights_statement: row.rights_statement,
            additional_notes: row.additional_notes,
            published_date: row.published_date.map(|d| date_from_row(d, "published date")).transpose()?,
            reviewed_on: row.reviewed_on.map(|d| date_from_row(d, "reviewed on date")).transpose()?,
            modified_on: datetime_from_row(row.modified_on, "modification date")?,
            filesize: u64::try_from(row.filesize).or_raise(|| ErrorKind::InvalidData("filesize"))?,
            active: row.active,
            duplicatable: row.duplicatable,
        })
    }
}
