use crate::extractor;
use crate::models::Context;
use crate::responder;
use providers::MultimodalProvider;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please upload files first.")]
    NoUploads,
    #[error("Please upload and process files first.")]
    NothingProcessed,
    #[error("Please enter a question.")]
    EmptyQuery,
    #[error("failed to stage uploads: {0}")]
    Staging(#[from] std::io::Error),
}

/// A file handed over by the front end, not yet on disk.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub files_processed: usize,
    pub total_fragments: usize,
}

#[derive(Debug, Default)]
pub struct Session {
    context: Context,
    files_processed: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn files_processed(&self) -> usize {
        self.files_processed
    }

    /// Rebuilds the context from `uploads`. Files are staged in a temporary
    /// directory that is removed when the batch ends, whatever happened to
    /// the individual files. The previous context is only replaced once the
    /// whole batch has been extracted.
    pub fn process_batch(&mut self, uploads: &[Upload]) -> Result<BatchSummary, SessionError> {
        self.process_batch_in(&std::env::temp_dir(), uploads)
    }

    /// Like [`Session::process_batch`], staging under `root`.
    pub fn process_batch_in(
        &mut self,
        root: &Path,
        uploads: &[Upload],
    ) -> Result<BatchSummary, SessionError> {
        if uploads.is_empty() {
            return Err(SessionError::NoUploads);
        }
        info!(files = uploads.len(), "processing batch");

        let staging = tempfile::tempdir_in(root)?;
        let mut context = Context::new();
        let mut processed = 0usize;
        for upload in uploads {
            let path = staging.path().join(staged_name(&upload.name));
            fs::write(&path, &upload.bytes)?;
            let fragments = extractor::extract(&path);
            debug!(name = %upload.name, fragments = fragments.len(), "file processed");
            context.extend(fragments);
            processed += 1;
        }
        drop(staging);

        self.context = context;
        self.files_processed = processed;
        let summary = BatchSummary {
            files_processed: processed,
            total_fragments: self.context.len(),
        };
        info!(
            files = summary.files_processed,
            fragments = summary.total_fragments,
            "context ready"
        );
        Ok(summary)
    }

    pub async fn ask(
        &self,
        provider: &dyn MultimodalProvider,
        model: &str,
        query: &str,
    ) -> Result<String, SessionError> {
        if self.files_processed == 0 {
            return Err(SessionError::NothingProcessed);
        }
        if query.trim().is_empty() {
            return Err(SessionError::EmptyQuery);
        }
        Ok(responder::answer(provider, model, query, &self.context).await)
    }
}

/// Keeps only the final path component so uploads cannot escape the
/// staging directory.
fn staged_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "upload".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Fragment;

    fn text_upload(name: &str, body: &str) -> Upload {
        Upload {
            name: name.to_string(),
            bytes: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn empty_batch_is_rejected() {
        let mut session = Session::new();
        assert!(matches!(
            session.process_batch(&[]),
            Err(SessionError::NoUploads)
        ));
    }

    #[test]
    fn batch_preserves_upload_order() {
        let mut session = Session::new();
        let summary = session
            .process_batch(&[
                text_upload("b.txt", "second"),
                text_upload("a.md", "first"),
                text_upload("c.xyz", "ignored"),
            ])
            .unwrap();
        assert_eq!(
            summary,
            BatchSummary {
                files_processed: 3,
                total_fragments: 3
            }
        );
        let texts: Vec<&str> = session
            .context()
            .iter()
            .filter_map(Fragment::as_text)
            .collect();
        assert_eq!(
            texts,
            vec!["second", "first", "Unsupported file type: .xyz"]
        );
    }

    #[test]
    fn reprocessing_replaces_context() {
        let mut session = Session::new();
        session
            .process_batch(&[text_upload("one.txt", "1"), text_upload("two.txt", "2")])
            .unwrap();
        session
            .process_batch(&[text_upload("three.txt", "3")])
            .unwrap();
        assert_eq!(session.files_processed(), 1);
        assert_eq!(session.context().len(), 1);
        assert_eq!(session.context().fragments()[0].as_text(), Some("3"));
    }

    #[test]
    fn failed_batch_keeps_previous_context() {
        let mut session = Session::new();
        session.process_batch(&[text_upload("keep.txt", "kept")]).unwrap();
        assert!(session.process_batch(&[]).is_err());
        assert_eq!(session.context().fragments()[0].as_text(), Some("kept"));
    }

    #[test]
    fn staging_directory_is_removed() {
        let root = tempfile::tempdir().unwrap();
        let mut session = Session::new();
        session
            .process_batch_in(
                root.path(),
                &[
                    text_upload("ok.txt", "fine"),
                    Upload {
                        name: "broken.png".into(),
                        bytes: b"not an image".to_vec(),
                    },
                ],
            )
            .unwrap();
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
        let last = session.context().fragments()[1].as_text().unwrap();
        assert!(last.starts_with("Error loading image: "));
    }

    #[test]
    fn staged_names_drop_directories() {
        assert_eq!(staged_name("../../etc/passwd.txt"), "passwd.txt");
        assert_eq!(staged_name("dir/notes.md"), "notes.md");
        assert_eq!(staged_name(".."), "upload");
    }

    #[tokio::test]
    async fn ask_requires_processed_files_and_a_question() {
        let provider = providers::noop::NoopProvider;
        let mut session = Session::new();
        assert!(matches!(
            session.ask(&provider, "m", "q").await,
            Err(SessionError::NothingProcessed)
        ));
        session.process_batch(&[text_upload("x.txt", "x")]).unwrap();
        assert!(matches!(
            session.ask(&provider, "m", "   ").await,
            Err(SessionError::EmptyQuery)
        ));
        let answer = session.ask(&provider, "m", "what?").await.unwrap();
        assert!(answer.starts_with("An error occurred during generation."));
    }
}
