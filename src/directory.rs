use core::fmt;
use std::collections::BTreeMap;

use crate::error::{TiffError, TiffFormatError, TiffResult};
use crate::ifd::Value;
use crate::tags::{Tag, Type};

/// One field of an image file directory: a type tag plus the decoded value(s).
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    field_type: Type,
    value: Value,
}

impl Entry {
    pub fn new(field_type: Type, value: Value) -> Self {
        Entry { field_type, value }
    }

    pub fn field_type(&self) -> Type {
        self.field_type
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

/// An Image File Directory (IFD) describing one sub-image.
///
/// A directory is a map of [`Tag`]s to decoded [`Value`]s, produced by a
/// directory walker and handed to the decoder read-only. There are at most
/// `u16::MAX` entries in any single directory; the order in the file is
/// implied to be ascending by tag value.
///
/// Decoding never mutates a directory, so sharing one between threads for
/// concurrent decodes of the same sub-image is sound as long as the byte
/// source is independently seekable per decode call.
#[doc(alias = "IFD")]
#[derive(Clone, PartialEq)]
pub struct Directory {
    entries: BTreeMap<u16, Entry>,
}

impl Directory {
    /// Create a directory in an initial state without entries.
    pub fn empty() -> Self {
        Directory {
            entries: BTreeMap::new(),
        }
    }

    /// Retrieve the entry associated with a tag.
    pub fn get(&self, tag: Tag) -> Option<&Entry> {
        self.entries.get(&tag.to_u16())
    }

    /// Check if the directory contains a specified tag.
    pub fn contains(&self, tag: Tag) -> bool {
        self.entries.contains_key(&tag.to_u16())
    }

    /// Iterate over all known and unknown tags in this directory.
    pub fn iter(&self) -> impl Iterator<Item = (Tag, &Entry)> + '_ {
        self.entries
            .iter()
            .map(|(k, v)| (Tag::from_u16_exhaustive(*k), v))
    }

    /// Insert an entry, replacing any previous entry for the same tag.
    pub fn insert(&mut self, tag: Tag, entry: Entry) {
        self.entries.insert(tag.to_u16(), entry);
    }

    /// Insert additional entries into the directory. Providing a tag multiple
    /// times or a tag that already exists within this directory overwrites
    /// the entry.
    pub fn extend(&mut self, iter: impl IntoIterator<Item = (Tag, Entry)>) {
        for (tag, entry) in iter {
            self.insert(tag, entry);
        }
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are any entries in this directory.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tries to retrieve a tag's value. Returns `None` if the tag is not
    /// present.
    pub fn find_tag(&self, tag: Tag) -> Option<&Value> {
        self.get(tag).map(Entry::value)
    }

    /// Retrieves a tag's value. Returns an error if the tag is not present.
    pub fn get_tag(&self, tag: Tag) -> TiffResult<&Value> {
        self.find_tag(tag)
            .ok_or_else(|| TiffError::FormatError(TiffFormatError::RequiredTagNotFound(tag)))
    }

    /// Tries to retrieve a tag and convert it to a `u16`.
    pub fn find_tag_u16(&self, tag: Tag) -> TiffResult<Option<u16>> {
        self.find_tag(tag).cloned().map(Value::into_u16).transpose()
    }

    /// Tries to retrieve a tag and convert it to a `u32`.
    pub fn find_tag_u32(&self, tag: Tag) -> TiffResult<Option<u32>> {
        self.find_tag(tag).cloned().map(Value::into_u32).transpose()
    }

    /// Retrieves a required tag as a `u16`.
    pub fn get_tag_u16(&self, tag: Tag) -> TiffResult<u16> {
        self.get_tag(tag)?.clone().into_u16()
    }

    /// Retrieves a required tag as a `u32`.
    pub fn get_tag_u32(&self, tag: Tag) -> TiffResult<u32> {
        self.get_tag(tag)?.clone().into_u32()
    }

    /// Tries to retrieve a tag as a vector of `u16` values.
    pub fn find_tag_u16_vec(&self, tag: Tag) -> TiffResult<Option<Vec<u16>>> {
        self.find_tag(tag)
            .cloned()
            .map(Value::into_u16_vec)
            .transpose()
    }

    /// Retrieves a required tag as a vector of `u16` values.
    pub fn get_tag_u16_vec(&self, tag: Tag) -> TiffResult<Vec<u16>> {
        self.get_tag(tag)?.clone().into_u16_vec()
    }

    /// Retrieves a required tag as a vector of `u64` values.
    pub fn get_tag_u64_vec(&self, tag: Tag) -> TiffResult<Vec<u64>> {
        self.get_tag(tag)?.clone().into_u64_vec()
    }

    /// Tries to retrieve a tag as a scalar or as the sum over its array
    /// values.
    pub fn find_tag_sum_u32(&self, tag: Tag) -> TiffResult<Option<u32>> {
        self.find_tag(tag)
            .cloned()
            .map(Value::into_sum_u32)
            .transpose()
    }

    /// Retrieves a required tag as an `f64`.
    pub fn get_tag_f64(&self, tag: Tag) -> TiffResult<f64> {
        self.get_tag(tag)?.clone().into_f64()
    }

    /// Retrieves a required tag as its raw bytes.
    pub fn get_tag_u8_vec(&self, tag: Tag) -> TiffResult<Vec<u8>> {
        self.get_tag(tag)?.clone().into_u8_vec()
    }
}

impl fmt::Debug for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directory")
            .field(
                "entries",
                &self.entries.iter().map(|(k, v)| (Tag::from_u16(*k), v)),
            )
            .finish()
    }
}

impl FromIterator<(Tag, Entry)> for Directory {
    fn from_iter<I: IntoIterator<Item = (Tag, Entry)>>(iter: I) -> Self {
        let mut dir = Directory::empty();
        dir.extend(iter);
        dir
    }
}
