use crate::entity::{NewVersion, Version};
use crate::error::Error;
use crate::models::datetime_from_row;

#[derive(sqlx::FromRow)]
pub(crate) struct VersionRow {
    pub(crate) id: i64,
    pub(crate) library_name: String,
    pub(crate) version_number: String,
    pub(crate) library_banner_id: Option<i64>,
    pub(crate) created_on: i64,
    pub(crate) created_by: Option<String>,
}
impl From<&NewVersion> for VersionRow {
    fn from(version: &NewVersion) -> Self {
        Self {
            id: 0,
            library_name: version.library_name.clone(),
            version_number: version.version_number.clone(),
            library_banner_id: version.library_banner_id,
            created_on: version.created_on.unix_timestamp(),
            created_by: version.created_by.clone(),
        }
    }
}
impl TryFrom<VersionRow> for Version {
    type Error = Error;
    fn try_from(row: VersionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            library_name: row.library_name,
            version_number: row.version_number,
            library_banner_id: row.library_banner_id,
            created_on: datetime_from_row(row.created_on, "creation date")?,
            created_by: row.created_by,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::UtcDateTime;

    #[test]
    fn test_row_to_model() {
        let row = VersionRow {
            id: 3,
            library_name: "Health Library".to_string(),
            version_number: "2.1".to_string(),
            library_banner_id: None,
            created_on: 1771177811,
            created_by: Some("librarian".to_string()),
        };
        let model = Version::try_from(row).unwrap();
        assert_eq!(model.created_on, UtcDateTime::from_unix_timestamp(1771177811).unwrap());
        assert_eq!(model.created_by.as_deref(), Some("librarian"));
    }

    #[test]
    fn test_model_to_row() {
        let created = UtcDateTime::now();
        let version = NewVersion { created_on: created, ..NewVersion::new("Health Library", "2.1") };
        let row = VersionRow::from(&version);
        // Converting to a Unix timestamp (measured in seconds) inherently strips the nanoseconds component.
        assert_eq!(row.created_on, created.unix_timestamp());
        assert_eq!(row.version_number, "2.1");
    }
}
