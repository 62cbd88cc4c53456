use dlms_snapshot::RowSets;
use dlms_store::Version;
use time::UtcDateTime;

/// File name of the manifest written beside every artifact.
pub const MANIFEST_NAME: &str = "manifest.json";

/// Describes a built artifact: which version it came from, when it was built
/// and what it contains.
#[derive(facet::Facet, Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub version_id: i64,
    pub library_name: String,
    pub version_number: String,
    /// Unix timestamp (seconds).
    pub built_at: i64,
    /// BLAKE3 hash of the artifact file, hex encoded.
    pub checksum: String,
    pub tables: Vec<TableCount>,
}

#[derive(facet::Facet, Debug, Clone, PartialEq, Eq)]
pub struct TableCount {
    pub table: String,
    pub rows: u64,
}

impl Manifest {
    pub(crate) fn new(version: &Version, rows: &RowSets, checksum: String, built_at: UtcDateTime) -> Self {
        Self {
            version_id: version.id,
            library_name: version.library_name.clone(),
            version_number: version.version_number.clone(),
            built_at: built_at.unix_timestamp(),
            checksum,
            tables: rows
                .counts()
                .into_iter()
                .map(|(table, rows)| TableCount { table: table.to_string(), rows: rows as u64 })
                .collect(),
        }
    }

    /// Row count of the given portable table, if it is listed.
    pub fn rows(&self, table: &str) -> Option<u64> {
        self.tables.iter().find(|t| t.table == table).map(|t| t.rows)
    }
}
