use crate::entity::{ImageGroup, LayoutImage};
use crate::error::{Error, ErrorKind};
use exn::OptionExt;
use std::path::PathBuf;

#[derive(sqlx::FromRow)]
pub(crate) struct LayoutImageRow {
    pub(crate) id: i64,
    pub(crate) image_file: String,
    pub(crate) image_group: i64,
}
impl TryFrom<LayoutImageRow> for LayoutImage {
    type Error = Error;
    fn try_from(row: LayoutImageRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            image_file: PathBuf::from(row.image_file),
            group: ImageGroup::from_i64(row.image_group).ok_or_raise(|| ErrorKind::InvalidData("image group"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, ImageGroup::Logo)]
    #[case(2, ImageGroup::Banner)]
    #[case(3, ImageGroup::Version)]
    fn test_row_to_model(#[case] group: i64, #[case] expected: ImageGroup) {
        let row = LayoutImageRow { id: 1, image_file: "images/logos/sun.png".to_string(), image_group: group };
        let model = LayoutImage::try_from(row).unwrap();
        assert_eq!(model.group, expected);
        assert_eq!(model.group.as_i64(), group);
    }

    #[test]
    fn test_unknown_group_is_invalid() {
        let row = LayoutImageRow { id: 1, image_file: "images/logos/sun.png".to_string(), image_group: 9 };
        assert!(LayoutImage::try_from(row).is_err());
    }
}
