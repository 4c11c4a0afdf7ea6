//! Polymorphic asset size specification.
//!
//! A manifest's `sizes` field takes one of three JSON shapes: an array of
//! integers (square dimensions), an array of `"WxH"` strings, or an object
//! with exactly the six Android density keys. The shapes carry no explicit
//! discriminant; they are told apart structurally, once, during
//! deserialization. The rest of the pipeline only ever sees the expanded
//! [`ResizeTarget`] list.

use serde::Deserialize;

/// The decided shape of an asset spec's `sizes` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SizeSpec {
    /// Ordered sequence of square or `"WxH"` entries.
    List(Vec<SizeEntry>),
    /// Fixed-key density mapping (ldpi through xxxhdpi).
    Density(DensityMap),
}

/// One element of a size sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeEntry {
    /// A bare integer: square target, substituted with the literal number.
    Square(u32),
    /// A `"WxH"` string: explicit target, substituted with the verbatim token.
    Explicit {
        width: u32,
        height: u32,
        /// The original `"WxH"` text, used for placeholder substitution.
        label: String,
    },
}

/// Density mapping with exactly the six Android density buckets.
///
/// Unknown keys are rejected so a typoed bucket fails at manifest load
/// instead of silently skipping a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DensityMap {
    pub ldpi: u32,
    pub mdpi: u32,
    pub hdpi: u32,
    pub xhdpi: u32,
    pub xxhdpi: u32,
    pub xxxhdpi: u32,
}

impl DensityMap {
    /// Buckets in the canonical ldpi → xxxhdpi order.
    pub fn buckets(&self) -> [(&'static str, u32); 6] {
        [
            ("ldpi", self.ldpi),
            ("mdpi", self.mdpi),
            ("hdpi", self.hdpi),
            ("xhdpi", self.xhdpi),
            ("xxhdpi", self.xxhdpi),
            ("xxxhdpi", self.xxxhdpi),
        ]
    }
}

/// A single fully resolved resize operation derived from a [`SizeSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeTarget {
    /// Text substituted for the `{{size}}` placeholder in the output template.
    pub token: String,
    pub width: u32,
    pub height: u32,
}

impl SizeSpec {
    /// Expand into resize targets in declaration order.
    ///
    /// Density maps expand in the fixed ldpi → xxxhdpi order.
    pub fn targets(&self) -> Vec<ResizeTarget> {
        match self {
            SizeSpec::List(entries) => entries
                .iter()
                .map(|entry| match entry {
                    SizeEntry::Square(side) => ResizeTarget {
                        token: side.to_string(),
                        width: *side,
                        height: *side,
                    },
                    SizeEntry::Explicit {
                        width,
                        height,
                        label,
                    } => ResizeTarget {
                        token: label.clone(),
                        width: *width,
                        height: *height,
                    },
                })
                .collect(),
            SizeSpec::Density(map) => map
                .buckets()
                .into_iter()
                .map(|(bucket, side)| ResizeTarget {
                    token: bucket.to_string(),
                    width: side,
                    height: side,
                })
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for SizeEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(side) => Ok(SizeEntry::Square(side)),
            Raw::Text(text) => parse_dimensions(&text).map_err(serde::de::Error::custom),
        }
    }
}

fn parse_dimensions(text: &str) -> Result<SizeEntry, String> {
    let (w, h) = text
        .split_once('x')
        .ok_or_else(|| format!("invalid size {text:?}: expected \"WIDTHxHEIGHT\""))?;
    let width = w
        .parse::<u32>()
        .map_err(|_| format!("invalid width in size {text:?}"))?;
    let height = h
        .parse::<u32>()
        .map_err(|_| format!("invalid height in size {text:?}"))?;
    Ok(SizeEntry::Explicit {
        width,
        height,
        label: text.to_string(),
    })
}
