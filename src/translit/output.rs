use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("output buffer is empty")]
pub struct EmptyBuffer;

/// Ordered Latin fragments produced for one line.
///
/// Rules only ever touch the most recent fragment, so every accessor that
/// needs one fails with [`EmptyBuffer`] instead of indexing blindly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    fragments: Vec<String>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, fragment: impl Into<String>) {
        self.fragments.push(fragment.into());
    }

    pub fn replace_last(&mut self, fragment: impl Into<String>) -> Result<(), EmptyBuffer> {
        *self.last_mut()? = fragment.into();
        Ok(())
    }

    /// Appends text onto the most recent fragment.
    pub fn extend_last(&mut self, text: &str) -> Result<(), EmptyBuffer> {
        self.last_mut()?.push_str(text);
        Ok(())
    }

    pub fn last(&self) -> Option<&str> {
        self.fragments.last().map(String::as_str)
    }

    pub fn last_mut(&mut self) -> Result<&mut String, EmptyBuffer> {
        self.fragments.last_mut().ok_or(EmptyBuffer)
    }

    /// False when the buffer is empty.
    pub fn last_ends_with(&self, suffix: &str) -> bool {
        self.last().is_some_and(|last| last.ends_with(suffix))
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn concat(&self) -> String {
        self.fragments.concat()
    }
}
