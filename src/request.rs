// SPDX-License-Identifier: GPL-3.0-only

use std::str::FromStr;

use zbus::zvariant;

use crate::{Result, error::Error};

/// Pattern kind for a filter entry: 0 is a glob, 1 a MIME type.
const FILTER_GLOB: u32 = 0;

pub type Filter = (String, Vec<(u32, String)>);
pub type Filters = Vec<Filter>;

/// A named group of file extensions, e.g. `Images` / `png,jpg,jpeg`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    /// Comma separated extensions without dot or wildcard
    pub spec: String,
}

impl FileFilter {
    pub fn new(name: impl Into<String>, spec: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spec: spec.into(),
        }
    }

    /// Converts to the portal's `(sa(us))` filter tuple.
    ///
    /// Extensions are passed as bare glob entries; the portal is responsible
    /// for matching them against file names.
    pub fn to_portal(&self) -> Result<Filter> {
        let mut patterns = Vec::new();
        for extension in self.spec.split(',') {
            if extension.is_empty() {
                return Err(Error::InvalidFilter {
                    name: self.name.clone(),
                    spec: self.spec.clone(),
                });
            }
            patterns.push((FILTER_GLOB, extension.to_string()));
        }
        Ok((self.name.clone(), patterns))
    }
}

/// Parses `Name=ext1,ext2`.
impl FromStr for FileFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, spec)) if !name.is_empty() && !spec.is_empty() => Ok(Self::new(name, spec)),
            _ => Err(format!("expected NAME=EXT[,EXT...], got {s:?}")),
        }
    }
}

#[derive(zvariant::SerializeDict, zvariant::DeserializeDict, zvariant::Type, Clone, Debug, PartialEq)]
#[zvariant(signature = "a{sv}")]
pub struct OpenFileOptions {
    handle_token: String,
    multiple: Option<bool>,
    filters: Option<Filters>,
}

impl OpenFileOptions {
    pub fn handle_token(&self) -> &str {
        &self.handle_token
    }

    pub fn multiple(&self) -> bool {
        self.multiple.unwrap_or(false)
    }

    pub fn filters(&self) -> &[Filter] {
        self.filters.as_deref().unwrap_or_default()
    }
}

/// Arguments of `org.freedesktop.portal.FileChooser.OpenFile`.
#[derive(Clone, Debug, PartialEq)]
pub struct OpenFileRequest {
    pub parent_window: String,
    pub title: String,
    pub options: OpenFileOptions,
}

impl OpenFileRequest {
    pub fn new(title: impl Into<String>, handle_token: impl Into<String>) -> Self {
        Self {
            // No window identifier is passed; the portal treats the dialog as unparented.
            parent_window: String::new(),
            title: title.into(),
            options: OpenFileOptions {
                handle_token: handle_token.into(),
                multiple: None,
                filters: None,
            },
        }
    }

    /// Requests multi-selection. Single selection is the portal's default, so
    /// `false` leaves the option out of the dictionary entirely.
    pub fn multiple(mut self, multiple: bool) -> Self {
        self.options.multiple = multiple.then_some(true);
        self
    }

    pub fn filters(mut self, filters: &[FileFilter]) -> Result<Self> {
        self.options.filters = if filters.is_empty() {
            None
        } else {
            Some(
                filters
                    .iter()
                    .map(FileFilter::to_portal)
                    .collect::<Result<Filters>>()?,
            )
        };
        Ok(self)
    }

    /// Message body, signature `ssa{sv}`.
    pub fn body(&self) -> (&str, &str, &OpenFileOptions) {
        (&self.parent_window, &self.title, &self.options)
    }
}
