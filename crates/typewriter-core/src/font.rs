//! Font catalog injected into the serializer and parser.
//!
//! Fonts are referenced from markup by id (`data-font-resource-id`) and by
//! display name (`data-font-name`). The catalog maps between the two; how the
//! set of fonts is discovered is up to whoever builds it.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::types::FontId;

static FONT_ID_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"data-font-resource-id="(\d+)""#).unwrap());
static FONT_NAME_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"data-font-name="([^"]+)""#).unwrap());

/// One selectable font.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FontEntry {
    pub id: FontId,
    /// Display name, as written to `data-font-name`.
    pub name: SmolStr,
    /// CSS family to load the font by on a sharing page, when it differs from `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<SmolStr>,
}

impl FontEntry {
    pub fn new(id: impl Into<FontId>, name: impl Into<SmolStr>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            family: None,
        }
    }

    /// Entry named from a resource identifier like `open_sans_bold`.
    pub fn from_resource(id: impl Into<FontId>, resource_name: &str) -> Self {
        Self::new(id, format_font_name(resource_name))
    }

    pub fn css_family(&self) -> &str {
        self.family.as_deref().unwrap_or(&self.name)
    }
}

/// The fonts available to one edit session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontCatalog {
    fonts: Vec<FontEntry>,
}

impl FontCatalog {
    pub fn new(fonts: impl IntoIterator<Item = FontEntry>) -> Self {
        Self {
            fonts: fonts.into_iter().collect(),
        }
    }

    /// Look a font up by id. `"0"` is the default typeface and never resolves.
    pub fn resolve_font(&self, id: &str) -> Option<&FontEntry> {
        if id == "0" {
            return None;
        }
        self.fonts.iter().find(|f| f.id == id)
    }

    /// Look a font up by display name, ignoring case and `_`/space differences.
    pub fn find_by_name(&self, name: &str) -> Option<&FontEntry> {
        let wanted = name_key(name);
        self.fonts.iter().find(|f| name_key(&f.name) == wanted)
    }

    pub fn insert(&mut self, entry: FontEntry) {
        self.fonts.retain(|f| f.id != entry.id);
        self.fonts.push(entry);
    }

    pub fn entries(&self) -> &[FontEntry] {
        &self.fonts
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Fonts referenced by a serialized fragment, by id or by name.
    ///
    /// References the catalog cannot resolve are skipped.
    pub fn used_fonts(&self, fragment: &str) -> BTreeSet<&FontEntry> {
        let by_id = FONT_ID_ATTR
            .captures_iter(fragment)
            .filter_map(|c| self.resolve_font(&c[1]));
        let by_name = FONT_NAME_ATTR
            .captures_iter(fragment)
            .filter_map(|c| self.find_by_name(&c[1]));
        by_id.chain(by_name).collect()
    }
}

/// Turn a resource identifier into a display name: `open_sans_bold` becomes
/// `Open Sans Bold`.
pub fn format_font_name(resource_name: &str) -> String {
    resource_name
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}
