// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Turns raw icon SVG into a templ component.
//!
//! The rewrite is textual: a `width="…" height="…"` pair becomes two
//! conditional attributes driven by `props.Width` / `props.Height`, and every
//! `fill="currentColor"` becomes a conditional `props.Color` with
//! `currentColor` as fallback. Bodies without those literals are wrapped
//! unchanged.

use std::sync::LazyLock;

use regex::Regex;

use crate::icon::{IconIdentity, ResolvedIcon};

static SIZE_ATTRS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"width="[^"]+" height="[^"]+""#).expect("valid size regex"));

const CURRENT_COLOR_FILL: &str = r#"fill="currentColor""#;

const SIZE_SLOTS: &str = r#"
		if props.Width != "" {
			width={ props.Width }
		}
		if props.Height != "" {
			height={ props.Height }
		}
		"#;

const COLOR_SLOT: &str = r#"
			if props.Color != "" {
				fill={ props.Color }
			} else {
				fill="currentColor"
			}
			"#;

/// Prefix for package names that would otherwise start with a digit.
pub const PACKAGE_PREFIX: &str = "icon";

/// Prefix for component names that would otherwise start with a digit.
pub const COMPONENT_PREFIX: &str = "Icon";

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub package_name: String,
    pub component_name: String,
    pub body: String,
}

/// Pure, deterministic templ generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, identity: &IconIdentity, raw_body: &str) -> GeneratedUnit {
        let package_name = package_name(&identity.collection);
        let component_name = component_name(&identity.name);
        let svg = rewrite_svg(raw_body);

        let body = format!(
            "package {pkg}\n\
             \n\
             type {comp}Props struct {{\n\
             \tWidth  string\n\
             \tHeight string\n\
             \tColor  string\n\
             }}\n\
             \n\
             templ {comp}(props {comp}Props) {{\n\
             \t{svg}\n\
             }}\n",
            pkg = package_name,
            comp = component_name,
            svg = svg,
        );

        GeneratedUnit {
            package_name,
            component_name,
            body,
        }
    }

    /// Fill the derived fields of an icon whose body has been fetched.
    pub fn apply(&self, icon: &mut ResolvedIcon) {
        let unit = self.generate(&icon.identity, &icon.raw_body);
        icon.package_name = unit.package_name;
        icon.component_name = unit.component_name;
        icon.rendered_template = unit.body;
    }
}

/// Lower-cased collection name without hyphens, e.g. `material-symbols` -> `materialsymbols`.
pub fn package_name(collection: &str) -> String {
    let name: String = collection.to_lowercase().chars().filter(|c| *c != '-').collect();
    if starts_with_digit(&name) {
        format!("{}{}", PACKAGE_PREFIX, name)
    } else {
        name
    }
}

/// PascalCase icon name, e.g. `home-outline` -> `HomeOutline`.
pub fn component_name(icon: &str) -> String {
    let name: String = icon.split('-').map(capitalize).collect();
    if starts_with_digit(&name) {
        format!("{}{}", COMPONENT_PREFIX, name)
    } else {
        name
    }
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn starts_with_digit(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn rewrite_svg(raw: &str) -> String {
    let sized = SIZE_ATTRS_RE.replace_all(raw, SIZE_SLOTS);
    sized.replace(CURRENT_COLOR_FILL, COLOR_SLOT)
}
