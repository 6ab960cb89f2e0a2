//! File attachments for a saved draft, producing a `CreateAttachment`
//! request.

use std::collections::BTreeMap;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;

use crate::error::{Error, Result};
use crate::item::ItemId;
use crate::log::Diagnostics;
use crate::request::{Finalized, RequestKind, envelope, finalize};
use crate::xml::XmlElement;

/// A named, base64 encoded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    /// File name shown to recipients.
    pub name: String,
    /// Base64 encoded content.
    pub content: String,
}

impl FileAttachment {
    /// Decodes the content.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>> {
        Ok(STANDARD.decode(&self.content)?)
    }
}

/// Attachments for one parent item, kept in the order they were added.
#[derive(Debug, Clone)]
pub struct AttachmentSet {
    parent: ItemId,
    entries: BTreeMap<usize, FileAttachment>,
    next_index: usize,
    diagnostics: Diagnostics,
}

impl AttachmentSet {
    /// Creates an empty set for the item the files are attached to.
    #[must_use]
    pub fn new(parent: ItemId) -> Self {
        Self {
            parent,
            entries: BTreeMap::new(),
            next_index: 0,
            diagnostics: Diagnostics::new("attachment"),
        }
    }

    /// Reads a file and attaches it under its base name.
    ///
    /// An unreadable file is logged as an ERROR and skipped.
    pub fn add_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| !name.is_empty());
        self.read_and_add(path, name);
    }

    /// Reads a file and attaches it under `name`.
    ///
    /// An unreadable file is logged as an ERROR and skipped.
    pub fn add_file_named(&mut self, path: impl AsRef<Path>, name: impl Into<String>) {
        let name = Some(name.into()).filter(|name| !name.is_empty());
        self.read_and_add(path.as_ref(), name);
    }

    /// Attaches in-memory content.
    pub fn add_bytes(&mut self, name: impl Into<String>, bytes: impl AsRef<[u8]>) {
        let name = Some(name.into()).filter(|name| !name.is_empty());
        self.insert(name, STANDARD.encode(bytes));
    }

    /// Attaches content that is already base64 encoded.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not valid base64.
    pub fn add_encoded(&mut self, name: impl Into<String>, content: impl Into<String>) -> Result<()> {
        let content: String = content.into().split_whitespace().collect();
        STANDARD.decode(&content)?;
        let name = Some(name.into()).filter(|name| !name.is_empty());
        self.insert(name, content);
        Ok(())
    }

    fn read_and_add(&mut self, path: &Path, name: Option<String>) {
        match std::fs::read(path) {
            Ok(bytes) => {
                self.diagnostics.info(format!(
                    "attached {} ({} bytes)",
                    path.display(),
                    bytes.len()
                ));
                self.insert(name, STANDARD.encode(bytes));
            }
            Err(source) => {
                let err = Error::Io {
                    path: path.to_path_buf(),
                    source,
                };
                self.diagnostics.error(err.to_string());
            }
        }
    }

    fn insert(&mut self, name: Option<String>, content: String) {
        let name = name.unwrap_or_else(|| {
            let generated = format!("noname.{}", rand::thread_rng().gen_range(10000..20000));
            self.diagnostics
                .warn(format!("attachment has no name, using '{generated}'"));
            generated
        });
        self.entries.insert(self.next_index, FileAttachment { name, content });
        self.next_index += 1;
    }

    /// Item the attachments belong to.
    #[must_use]
    pub const fn parent(&self) -> &ItemId {
        &self.parent
    }

    /// Attachments in add order.
    pub fn iter(&self) -> impl Iterator<Item = &FileAttachment> {
        self.entries.values()
    }

    /// Number of attachments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Diagnostics recorded so far.
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Builds and validates the `CreateAttachment` request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoAttachments`] when the set is empty, or an error if
    /// the request cannot be serialized or fails schema validation.
    pub fn finalize(mut self) -> Result<Finalized> {
        if self.entries.is_empty() {
            self.diagnostics.crit("No attachments");
            return Err(Error::NoAttachments);
        }

        let mut attachments = XmlElement::new("m:Attachments");
        for attachment in self.entries.values() {
            attachments.push(
                XmlElement::new("t:FileAttachment")
                    .child(XmlElement::leaf("t:Name", &attachment.name))
                    .child(XmlElement::leaf("t:Content", &attachment.content)),
            );
        }

        let operation = XmlElement::new("m:CreateAttachment")
            .child(
                XmlElement::new("m:ParentItemId")
                    .attr("Id", &self.parent.id)
                    .attr("ChangeKey", &self.parent.change_key),
            )
            .child(attachments);

        finalize(
            RequestKind::CreateAttachment,
            &envelope(operation),
            self.diagnostics,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parent() -> ItemId {
        ItemId::new("A1", "C1")
    }

    #[test]
    fn test_empty_set_fails() {
        let set = AttachmentSet::new(parent());
        assert!(matches!(set.finalize(), Err(Error::NoAttachments)));
    }

    #[test]
    fn test_add_bytes_and_finalize() {
        let mut set = AttachmentSet::new(parent());
        set.add_bytes("hello.txt", b"hello");
        let finalized = set.finalize().unwrap();
        let xml = finalized.request.xml();
        assert!(xml.contains("<m:ParentItemId Id=\"A1\" ChangeKey=\"C1\"/>"));
        assert!(xml.contains("<t:Name>hello.txt</t:Name>"));
        assert!(xml.contains("<t:Content>aGVsbG8=</t:Content>"));
    }

    #[test]
    fn test_add_order_is_kept() {
        let mut set = AttachmentSet::new(parent());
        set.add_bytes("b.txt", b"2");
        set.add_bytes("a.txt", b"1");
        let names: Vec<_> = set.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["b.txt", "a.txt"]);

        let xml = set.finalize().unwrap().request.xml().to_string();
        assert!(xml.find("b.txt").unwrap() < xml.find("a.txt").unwrap());
    }

    #[test]
    fn test_add_file_uses_base_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"a,b\n1,2\n")
            .unwrap();

        let mut set = AttachmentSet::new(parent());
        set.add_file(&path);
        let attachment = set.iter().next().unwrap();
        assert_eq!(attachment.name, "report.csv");
        assert_eq!(attachment.decode().unwrap(), b"a,b\n1,2\n");
    }

    #[test]
    fn test_missing_file_is_logged_and_skipped() {
        let mut set = AttachmentSet::new(parent());
        set.add_file("/definitely/not/here.bin");
        assert!(set.is_empty());
        assert!(set.diagnostics().has_errors());
    }

    #[test]
    fn test_nameless_attachment_gets_generated_name() {
        let mut set = AttachmentSet::new(parent());
        set.add_bytes("", b"x");
        let name = &set.iter().next().unwrap().name;
        let suffix: u32 = name.strip_prefix("noname.").unwrap().parse().unwrap();
        assert!((10000..20000).contains(&suffix));
    }

    #[test]
    fn test_add_encoded_rejects_garbage() {
        let mut set = AttachmentSet::new(parent());
        assert!(set.add_encoded("x", "***").is_err());
        set.add_encoded("y", "aGVs\nbG8=").unwrap();
        assert_eq!(set.iter().next().unwrap().content, "aGVsbG8=");
    }
}
