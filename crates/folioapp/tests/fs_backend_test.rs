use folioapp::commands::articles::NewArticle;
use folioapp::config::FolioConfig;
use folioapp::model::{Article, Collection, SiteSettings, Tag, ThemeMode};
use folioapp::store::backend::StorageBackend;
use folioapp::store::fs_backend::FsBackend;
use folioapp::store::{DataStore, FileStore};
use folioapp::FolioApi;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().join("data"));
    (dir, backend)
}

#[test]
fn test_missing_files_load_empty() {
    let (_dir, backend) = setup();
    let articles: Vec<Article> = backend.load_collection().unwrap();
    assert!(articles.is_empty());
    assert!(backend.load_settings().unwrap().is_none());
}

#[test]
fn test_failed_write_leaves_no_tmp_files() {
    let (_dir, backend) = setup();
    // A non-empty directory where the collection file belongs makes the
    // rename fail.
    let path = backend.collection_path(Collection::Tags);
    fs::create_dir_all(path.join("blocked")).unwrap();

    let tags = vec![Tag::new("rust".into(), "rust".into())];
    assert!(backend.save_collection(&tags).is_err());

    let leftovers: Vec<String> = fs::read_dir(backend.data_dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "left behind: {:?}", leftovers);
}

#[test]
fn test_collection_round_trip_leaves_no_tmp_files() {
    let (_dir, backend) = setup();
    let tags = vec![
        Tag::new("rust".into(), "rust".into()),
        Tag::new("web".into(), "web".into()),
    ];
    backend.save_collection(&tags).unwrap();

    let path = backend.collection_path(Collection::Tags);
    assert!(path.exists());
    let loaded: Vec<Tag> = backend.load_collection().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].id, tags[0].id);

    for entry in fs::read_dir(backend.data_dir()).unwrap() {
        let name = entry.unwrap().file_name().to_string_lossy().to_string();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_blank_file_loads_empty() {
    let (_dir, backend) = setup();
    fs::create_dir_all(backend.data_dir()).unwrap();
    fs::write(backend.collection_path(Collection::Articles), "  \n").unwrap();
    let articles: Vec<Article> = backend.load_collection().unwrap();
    assert!(articles.is_empty());
}

#[test]
fn test_corrupt_file_is_an_error() {
    let (_dir, backend) = setup();
    fs::create_dir_all(backend.data_dir()).unwrap();
    fs::write(backend.collection_path(Collection::Articles), "{not json").unwrap();
    assert!(backend.load_collection::<Article>().is_err());
}

#[test]
fn test_settings_persist() {
    let (_dir, backend) = setup();
    let settings = SiteSettings {
        theme: ThemeMode::Dark,
        ..SiteSettings::default()
    };
    backend.save_settings(&settings).unwrap();
    assert_eq!(backend.load_settings().unwrap(), Some(settings));
}

#[test]
fn test_file_store_tombstones_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let id = {
        let mut store = FileStore::open(dir.path());
        let article = Article::new("Kept".into(), "kept".into(), String::new());
        store.save(&article).unwrap();
        store.soft_delete::<Article>(&article.id).unwrap();
        article.id
    };

    let store = FileStore::open(dir.path());
    assert!(store.list::<Article>().unwrap().is_empty());
    assert!(store.get::<Article>(&id).is_err());
    assert_eq!(store.list_deleted::<Article>().unwrap().len(), 1);

    let raw = fs::read_to_string(dir.path().join("articles.json")).unwrap();
    assert!(raw.contains("\"deleted\": true"));
}

#[test]
fn test_api_over_file_store() {
    let dir = TempDir::new().unwrap();
    let mut api = FolioApi::new(FileStore::open(dir.path()), FolioConfig::defaults().unwrap());
    api.ensure_tags(&["rust".to_string()]).unwrap();
    let tag_id = api.resolve::<Tag>("rust").unwrap();
    api.create_article(NewArticle {
        title: "On Disk".into(),
        content: "Stored as JSON".into(),
        tag_ids: vec![tag_id],
        ..Default::default()
    })
    .unwrap();

    let reopened = FolioApi::new(FileStore::open(dir.path()), FolioConfig::defaults().unwrap());
    let article = reopened.get_article("on-disk").unwrap();
    assert_eq!(article.tag_ids, vec![tag_id]);
    assert_eq!(reopened.store().get::<Tag>(&tag_id).unwrap().usage_count, 1);
}
