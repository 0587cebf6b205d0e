//! Language options handed to the parser and scope analyzer.

use serde::{Deserialize, Serialize};

/// Script or module goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Script,
    Module,
}

/// Parser and analyzer settings for one file.
///
/// `ecma_version` accepts both edition numbers (`5`, `6`) and years
/// (`2015`, `2022`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageOptions {
    pub ecma_version: u32,
    pub source_type: SourceType,
    /// Treat the whole file as strict code.
    pub implied_strict: bool,
}

impl LanguageOptions {
    /// The most recent edition the parser understands.
    pub const LATEST: u32 = 2024;

    /// Creates options for the given edition in script mode.
    pub const fn new(ecma_version: u32) -> Self {
        Self {
            ecma_version,
            source_type: SourceType::Script,
            implied_strict: false,
        }
    }

    /// Switches to module goal.
    pub const fn module(mut self) -> Self {
        self.source_type = SourceType::Module;
        self
    }

    /// Enables implied strict mode.
    pub const fn implied_strict(mut self) -> Self {
        self.implied_strict = true;
        self
    }

    /// Returns the edition as a year, keeping 3 and 5 as is.
    pub const fn year(&self) -> u32 {
        match self.ecma_version {
            6..=99 => self.ecma_version + 2009,
            v => v,
        }
    }

    /// `let`, `const` and `class` create block-scoped bindings.
    pub const fn has_block_scoping(&self) -> bool {
        self.year() >= 2015
    }

    /// `1_000` style numeric separators are allowed.
    pub const fn has_numeric_separators(&self) -> bool {
        self.year() >= 2021
    }

    /// `static { }` blocks are allowed in class bodies.
    pub const fn has_static_blocks(&self) -> bool {
        self.year() >= 2022
    }

    /// The file starts out in strict mode.
    pub const fn is_strict(&self) -> bool {
        self.implied_strict || matches!(self.source_type, SourceType::Module)
    }
}

impl Default for LanguageOptions {
    fn default() -> Self {
        Self::new(Self::LATEST)
    }
}
