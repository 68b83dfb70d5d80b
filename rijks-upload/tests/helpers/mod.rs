//! Shared test helpers: in-memory service fakes and pipeline wiring

#![allow(dead_code)]

use async_trait::async_trait;
use rijks_common::config::TomlConfig;
use rijks_common::AppendLog;
use rijks_upload::config::ConfigOverrides;
use rijks_upload::metadata::UploadDescriptor;
use rijks_upload::models::CollectionResponse;
use rijks_upload::services::{
    CollectionSource, MediaProbe, MediaRepository, RijksError, WikiError,
};
use rijks_upload::{Pipeline, UploaderConfig};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Collection API fake keyed by object number
#[derive(Default)]
pub struct FakeCollection {
    objects: Mutex<HashMap<String, Value>>,
}

impl FakeCollection {
    pub fn with(self, collection_id: &str, response: Value) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert(collection_id.to_string(), response);
        self
    }
}

#[async_trait]
impl CollectionSource for FakeCollection {
    async fn fetch_object(&self, collection_id: &str) -> Result<CollectionResponse, RijksError> {
        let value = self
            .objects
            .lock()
            .unwrap()
            .get(collection_id)
            .cloned()
            .ok_or_else(|| RijksError::Api(404, "not found".to_string()))?;
        serde_json::from_value(value).map_err(|e| RijksError::Parse(e.to_string()))
    }
}

/// Media probe answering one content type for every URL
pub struct FakeMedia {
    content_type: Option<String>,
}

impl FakeMedia {
    pub fn new(content_type: Option<&str>) -> Self {
        Self {
            content_type: content_type.map(str::to_string),
        }
    }
}

#[async_trait]
impl MediaProbe for FakeMedia {
    async fn content_type(&self, _media_url: &str) -> Result<Option<String>, RijksError> {
        Ok(self.content_type.clone())
    }
}

/// Wiki fake recording every call
#[derive(Default)]
pub struct FakeRepository {
    pub logins: Mutex<usize>,
    pub uploads: Mutex<Vec<UploadDescriptor>>,
    pub edits: Mutex<Vec<(String, String)>>,
    pages: Mutex<HashMap<String, String>>,
    failing_uploads: HashSet<String>,
    reject_login: bool,
    panic_on_upload: HashSet<String>,
    failing_edits: HashSet<String>,
    missing_pages: HashSet<String>,
}

impl FakeRepository {
    /// Uploads whose filename contains `needle` are rejected
    pub fn failing_upload(mut self, needle: &str) -> Self {
        self.failing_uploads.insert(needle.to_string());
        self
    }

    pub fn panicking_upload(mut self, needle: &str) -> Self {
        self.panic_on_upload.insert(needle.to_string());
        self
    }

    /// Edits of pages whose title contains `needle` are rejected
    pub fn failing_edit(mut self, needle: &str) -> Self {
        self.failing_edits.insert(needle.to_string());
        self
    }

    /// Uploads whose filename contains `needle` leave no readable page behind
    pub fn missing_page(mut self, needle: &str) -> Self {
        self.missing_pages.insert(needle.to_string());
        self
    }

    pub fn rejecting_login(mut self) -> Self {
        self.reject_login = true;
        self
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn edit_count(&self) -> usize {
        self.edits.lock().unwrap().len()
    }

    pub fn login_count(&self) -> usize {
        *self.logins.lock().unwrap()
    }
}

#[async_trait]
impl MediaRepository for FakeRepository {
    async fn login(&self, _username: &str, _password: &str) -> Result<(), WikiError> {
        *self.logins.lock().unwrap() += 1;
        if self.reject_login {
            return Err(WikiError::LoginRejected("Failed".to_string()));
        }
        Ok(())
    }

    async fn upload(&self, descriptor: &UploadDescriptor) -> Result<(), WikiError> {
        if self.panic_on_upload.iter().any(|n| descriptor.filename.contains(n.as_str())) {
            panic!("upload exploded for {}", descriptor.filename);
        }
        if self.failing_uploads.iter().any(|n| descriptor.filename.contains(n.as_str())) {
            return Err(WikiError::Api {
                code: "fileexists-no-change".to_string(),
                info: "duplicate".to_string(),
            });
        }
        self.uploads.lock().unwrap().push(descriptor.clone());
        if self.missing_pages.iter().any(|n| descriptor.filename.contains(n.as_str())) {
            return Ok(());
        }
        self.pages.lock().unwrap().insert(
            format!("File:{}", descriptor.filename),
            "=={{int:filedesc}}==".to_string(),
        );
        Ok(())
    }

    async fn page(&self, title: &str) -> Result<String, WikiError> {
        self.pages
            .lock()
            .unwrap()
            .get(title)
            .cloned()
            .ok_or_else(|| WikiError::MissingPage(title.to_string()))
    }

    async fn edit_page(&self, title: &str, content: &str, _summary: &str) -> Result<(), WikiError> {
        if self.failing_edits.iter().any(|n| title.contains(n.as_str())) {
            return Err(WikiError::Api {
                code: "protectedpage".to_string(),
                info: "This page has been protected".to_string(),
            });
        }
        self.edits
            .lock()
            .unwrap()
            .push((title.to_string(), content.to_string()));
        Ok(())
    }
}

/// Public-domain object with an image
pub fn eligible_object(collection_id: &str) -> Value {
    json!({
        "artObject": {
            "objectNumber": collection_id,
            "copyrightHolder": null,
            "hasImage": true,
            "webImage": { "url": format!("https://images.example.org/{}", collection_id) },
            "objectTypes": ["painting"],
            "objectCollection": ["paintings"],
            "principalMakers": [
                { "name": "Johannes Vermeer", "productionPlaces": ["Delft"] }
            ],
            "longTitle": format!("The [Milkmaid] {}", collection_id),
            "title": "The Milkmaid",
            "description": "Melkmeid",
            "plaqueDescriptionEnglish": "A maid pours milk",
            "dating": { "yearEarly": 1660, "yearLate": 1660 }
        }
    })
}

pub fn copyrighted_object(collection_id: &str) -> Value {
    let mut object = eligible_object(collection_id);
    object["artObject"]["copyrightHolder"] = json!("© Estate of the artist");
    object
}

/// Pipeline wired to fakes with logs in a temp dir
pub struct TestRig {
    pub dir: TempDir,
    pub repository: Arc<FakeRepository>,
    pub pipeline: Arc<Pipeline>,
}

impl TestRig {
    pub fn new(collection: FakeCollection, media: FakeMedia, repository: FakeRepository) -> Self {
        Self::with_toml(collection, media, repository, TomlConfig::default())
    }

    pub fn with_toml(
        collection: FakeCollection,
        media: FakeMedia,
        repository: FakeRepository,
        toml: TomlConfig,
    ) -> Self {
        let dir = TempDir::new().unwrap();
        let overrides = ConfigOverrides {
            status_log: Some(dir.path().join("status.txt")),
            error_log: Some(dir.path().join("err.txt")),
            input_file: Some(dir.path().join("data.csv")),
            api_key: Some("test-key".to_string()),
            wiki_username: Some("Tester@bot".to_string()),
            wiki_password: Some("secret".to_string()),
            ..Default::default()
        };
        let config = UploaderConfig::resolve(overrides, &toml).unwrap();

        let repository = Arc::new(repository);
        let pipeline = Arc::new(Pipeline::new(
            Arc::new(config.clone()),
            Arc::new(collection),
            Arc::new(media),
            repository.clone(),
            Arc::new(AppendLog::new(&config.status_log)),
            Arc::new(AppendLog::new(&config.error_log)),
        ));

        Self {
            dir,
            repository,
            pipeline,
        }
    }

    pub fn input_path(&self) -> PathBuf {
        self.dir.path().join("data.csv")
    }

    pub fn status_lines(&self) -> Vec<String> {
        read_lines(self.dir.path().join("status.txt"))
    }

    pub fn error_lines(&self) -> Vec<String> {
        read_lines(self.dir.path().join("err.txt"))
    }
}

fn read_lines(path: PathBuf) -> Vec<String> {
    std::fs::read_to_string(path)
        .map(|content| content.lines().map(str::to_string).collect())
        .unwrap_or_default()
}
