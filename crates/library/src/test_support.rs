//! A small library shared by the build and clone tests.
//!
//! Version "1.0" of "Lib" has a root folder `F1` showing `C1`, and a child
//! folder `F2` (parent `F1`) showing `C1` and `C2`. `C3` exists in the store
//! but is not shown anywhere. `C1` is tagged with a "Subject" and a
//! "Language" value; only "Subject" is on the version's whitelist.

use dlms_store::{
    Content, Database, Folder, ImageGroup, Metadata, MetadataType, Module, NewContent, NewFolder, NewModule,
    NewVersion, Repository, Version,
};
use time::{Date, Month};

pub(crate) struct Seed {
    pub db: Database,
    pub repo: Repository,
    pub version: Version,
    pub subject: MetadataType,
    pub health: Metadata,
    pub english: Metadata,
    pub module: Module,
    pub f1: Folder,
    pub f2: Folder,
    pub c1: Content,
    pub c2: Content,
    pub c3: Content,
}

pub(crate) async fn seed() -> Seed {
    let db = Database::connect_in_memory().await.unwrap();
    let repo = Repository::from(&db);

    let subject = repo.insert_metadata_type("Subject").await.unwrap();
    let language = repo.insert_metadata_type("Language").await.unwrap();
    let health = repo.insert_metadata("Health", subject.id).await.unwrap();
    let english = repo.insert_metadata("English", language.id).await.unwrap();
    let logo = repo.insert_layout_image("images/logos/health.png", ImageGroup::Logo).await.unwrap();
    let module = repo
        .insert_module(&NewModule {
            module_name: "Reader".to_string(),
            module_file: "modules/reader.zip".to_string(),
            logo_img_id: Some(logo.id),
        })
        .await
        .unwrap();

    let mut c1 = NewContent::new("Clean Water", "water.pdf", 2048);
    c1.published_date = Some(Date::from_calendar_date(2019, Month::March, 7).unwrap());
    c1.rights_statement = Some("CC-BY".to_string());
    let c1 = repo.insert_content(&c1, &[health.id, english.id]).await.unwrap();
    let c2 = repo.insert_content(&NewContent::new("Hand Washing", "hands.mp4", 4096), &[]).await.unwrap();
    let c3 = repo.insert_content(&NewContent::new("Unused", "unused.pdf", 1), &[health.id]).await.unwrap();

    let version = repo.insert_version(&NewVersion::new("Lib", "1.0")).await.unwrap();
    repo.set_version_metadata_types(version.id, &[subject.id]).await.unwrap();
    repo.set_version_modules(version.id, &[module.id]).await.unwrap();
    let f1 = repo
        .insert_folder(&NewFolder { logo_img_id: Some(logo.id), ..NewFolder::new("F1", version.id, None) })
        .await
        .unwrap();
    let f2 = repo.insert_folder(&NewFolder::new("F2", version.id, Some(f1.id))).await.unwrap();
    repo.set_folder_contents(f1.id, &[c1.id]).await.unwrap();
    repo.set_folder_contents(f2.id, &[c1.id, c2.id]).await.unwrap();

    Seed { db, repo, version, subject, health, english, module, f1, f2, c1, c2, c3 }
}
