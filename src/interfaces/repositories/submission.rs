use std::path::PathBuf;

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt};

use crate::{entities::submission::Submission, errors::PersistenceError};

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Writes the record and returns where it landed.
    async fn save(&self, submission: &Submission) -> Result<PathBuf, PersistenceError>;
}

/// Stores one pretty-printed JSON file per submission, named after its id.
#[derive(Debug, Clone)]
pub struct FileSubmissionStore {
    dir: PathBuf,
}

impl FileSubmissionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileSubmissionStore { dir: dir.into() }
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

#[async_trait]
impl SubmissionStore for FileSubmissionStore {
    async fn save(&self, submission: &Submission) -> Result<PathBuf, PersistenceError> {
        fs::create_dir_all(&self.dir).await?;

        let record = serde_json::to_vec_pretty(submission)?;
        let path = self.path_for(&submission.id);

        // create_new: an id collision must not overwrite an earlier record
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(&record).await?;
        file.sync_all().await?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::submission::{ContactForm, RequestOrigin},
        validation::validate_contact,
    };

    fn submission() -> Submission {
        let form = ContactForm {
            name: Some("Ada".into()),
            email: Some("ada@example.com".into()),
            subject: Some("Hello".into()),
            message: Some("Lovely portfolio".into()),
        };
        let origin = RequestOrigin {
            source_ip: Some("127.0.0.1".into()),
            user_agent: Some("test-agent".into()),
        };
        Submission::accept(validate_contact(&form).unwrap(), origin)
    }

    #[actix_rt::test]
    async fn writes_a_json_record_and_creates_the_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileSubmissionStore::new(tmp.path().join("nested").join("submissions"));
        let submission = submission();

        let path = store.save(&submission).await.unwrap();

        assert_eq!(path, store.path_for(&submission.id));
        let written: Submission = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written, submission);
        assert_eq!(written.source_ip.as_deref(), Some("127.0.0.1"));
        assert_eq!(written.user_agent.as_deref(), Some("test-agent"));
    }

    #[actix_rt::test]
    async fn refuses_to_overwrite_an_existing_record() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileSubmissionStore::new(tmp.path());
        let submission = submission();

        store.save(&submission).await.unwrap();
        let second = store.save(&submission).await;

        assert!(matches!(second, Err(PersistenceError::Io(_))));
    }

    #[actix_rt::test]
    async fn unusable_directory_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();
        let store = FileSubmissionStore::new(blocker.join("submissions"));

        let result = store.save(&submission()).await;

        assert!(matches!(result, Err(PersistenceError::Io(_))));
    }
}
