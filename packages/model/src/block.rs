//! # Blocks
//!
//! A block is the smallest unit of content on a slide or page. Its payload is
//! a closed sum type: one variant per block kind, each carrying only the
//! fields that kind renders.
//!
//! ## JSON shape
//!
//! ```text
//! { "id": "…", "type": "stat-card", "content": { "stat": { "value": "99.9%", "label": "Uptime" } }, "style": { "align": "center" } }
//! ```

use crate::document::DocumentKind;
use crate::error::{ModelError, ModelResult};
use crate::patch::ContentPatch;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Block type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Heading,
    Subheading,
    Paragraph,
    BulletList,
    StatCard,
    StatGrid,
    Quote,
    SpecTable,
    Callout,
    Divider,
    Cta,
    Image,
    Chart,
    IdentityCard,
    ChallengeSolution,
    ResultsGrid,
    HeroImage,
}

impl BlockKind {
    pub const ALL: [BlockKind; 17] = [
        BlockKind::Heading,
        BlockKind::Subheading,
        BlockKind::Paragraph,
        BlockKind::BulletList,
        BlockKind::StatCard,
        BlockKind::StatGrid,
        BlockKind::Quote,
        BlockKind::SpecTable,
        BlockKind::Callout,
        BlockKind::Divider,
        BlockKind::Cta,
        BlockKind::Image,
        BlockKind::Chart,
        BlockKind::IdentityCard,
        BlockKind::ChallengeSolution,
        BlockKind::ResultsGrid,
        BlockKind::HeroImage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Heading => "heading",
            BlockKind::Subheading => "subheading",
            BlockKind::Paragraph => "paragraph",
            BlockKind::BulletList => "bullet-list",
            BlockKind::StatCard => "stat-card",
            BlockKind::StatGrid => "stat-grid",
            BlockKind::Quote => "quote",
            BlockKind::SpecTable => "spec-table",
            BlockKind::Callout => "callout",
            BlockKind::Divider => "divider",
            BlockKind::Cta => "cta",
            BlockKind::Image => "image",
            BlockKind::Chart => "chart",
            BlockKind::IdentityCard => "identity-card",
            BlockKind::ChallengeSolution => "challenge-solution",
            BlockKind::ResultsGrid => "results-grid",
            BlockKind::HeroImage => "hero-image",
        }
    }

    /// Whether blocks of this kind can be placed in a document of `kind`.
    ///
    /// Case-study pages carry the narrative blocks (company identity,
    /// challenge/solution, results); charts and calls to action are
    /// presentation-only. Everything else is shared.
    pub fn is_available_in(&self, kind: DocumentKind) -> bool {
        match self {
            BlockKind::IdentityCard
            | BlockKind::ChallengeSolution
            | BlockKind::ResultsGrid
            | BlockKind::HeroImage => kind == DocumentKind::CaseStudy,
            BlockKind::Chart | BlockKind::Cta => kind == DocumentKind::Presentation,
            _ => true,
        }
    }

    /// Placeholder content a freshly added block of this kind starts with
    pub fn default_content(&self) -> BlockContent {
        match self {
            BlockKind::Heading => BlockContent::Heading {
                text: "New Heading".to_string(),
                level: DEFAULT_HEADING_LEVEL,
            },
            BlockKind::Subheading => BlockContent::Subheading {
                text: "New Subheading".to_string(),
            },
            BlockKind::Paragraph => BlockContent::Paragraph {
                text: "Enter your text here...".to_string(),
            },
            BlockKind::BulletList => BlockContent::BulletList {
                items: vec!["First point".to_string(), "Second point".to_string()],
            },
            BlockKind::StatCard => BlockContent::StatCard {
                stat: Stat::new("100%", "Metric"),
            },
            BlockKind::StatGrid => BlockContent::StatGrid {
                stats: vec![
                    Stat::new("99.9%", "Accuracy"),
                    Stat::new("24/7", "Monitoring"),
                    Stat::new("50+", "Countries"),
                ],
            },
            BlockKind::Quote => BlockContent::Quote {
                quote: Quotation {
                    text: "Quote text".to_string(),
                    author: "Author".to_string(),
                    role: "Role".to_string(),
                },
            },
            BlockKind::SpecTable => BlockContent::SpecTable {
                rows: vec![
                    SpecRow::new("Measuring range", "0-100"),
                    SpecRow::new("Accuracy", "±0.1%"),
                ],
            },
            BlockKind::Callout => BlockContent::Callout {
                text: "Important note".to_string(),
                tone: CalloutTone::Info,
            },
            BlockKind::Divider => BlockContent::Divider {},
            BlockKind::Cta => BlockContent::Cta {
                text: "Learn more".to_string(),
                url: String::new(),
            },
            BlockKind::Image => BlockContent::Image {
                src: String::new(),
                alt: String::new(),
                caption: None,
            },
            BlockKind::Chart => BlockContent::Chart {
                chart: ChartSpec {
                    kind: ChartKind::Bar,
                    title: "Chart".to_string(),
                    series: vec![
                        DataPoint::new("A", 40.0),
                        DataPoint::new("B", 65.0),
                        DataPoint::new("C", 80.0),
                    ],
                },
            },
            BlockKind::IdentityCard => BlockContent::IdentityCard {
                company: "Company".to_string(),
                industry: "Industry".to_string(),
                location: "Location".to_string(),
                logo: None,
            },
            BlockKind::ChallengeSolution => BlockContent::ChallengeSolution {
                challenge: "The challenge".to_string(),
                solution: "The solution".to_string(),
            },
            BlockKind::ResultsGrid => BlockContent::ResultsGrid {
                results: vec![
                    Stat::new("30%", "Less downtime"),
                    Stat::new("2x", "Faster commissioning"),
                ],
            },
            BlockKind::HeroImage => BlockContent::HeroImage {
                src: String::new(),
                title: "Title".to_string(),
                subtitle: None,
            },
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_HEADING_LEVEL: u8 = 2;

fn default_heading_level() -> u8 {
    DEFAULT_HEADING_LEVEL
}

/// A value/label pair (stat cards, stat grids, results)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

impl Stat {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quotation {
    pub text: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecRow {
    pub label: String,
    pub value: String,
}

impl SpecRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalloutTone {
    #[default]
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub label: String,
    pub value: f64,
}

impl DataPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub series: Vec<DataPoint>,
}

/// Block payload, one variant per [`BlockKind`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "kebab-case")]
pub enum BlockContent {
    Heading {
        text: String,
        #[serde(default = "default_heading_level")]
        level: u8,
    },
    Subheading {
        text: String,
    },
    Paragraph {
        text: String,
    },
    BulletList {
        items: Vec<String>,
    },
    StatCard {
        stat: Stat,
    },
    StatGrid {
        stats: Vec<Stat>,
    },
    Quote {
        quote: Quotation,
    },
    SpecTable {
        rows: Vec<SpecRow>,
    },
    Callout {
        text: String,
        #[serde(default)]
        tone: CalloutTone,
    },
    Divider {},
    Cta {
        text: String,
        #[serde(default)]
        url: String,
    },
    Image {
        src: String,
        #[serde(default)]
        alt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    Chart {
        chart: ChartSpec,
    },
    IdentityCard {
        company: String,
        #[serde(default)]
        industry: String,
        #[serde(default)]
        location: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        logo: Option<String>,
    },
    ChallengeSolution {
        challenge: String,
        solution: String,
    },
    ResultsGrid {
        results: Vec<Stat>,
    },
    HeroImage {
        src: String,
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subtitle: Option<String>,
    },
}

impl BlockContent {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockContent::Heading { .. } => BlockKind::Heading,
            BlockContent::Subheading { .. } => BlockKind::Subheading,
            BlockContent::Paragraph { .. } => BlockKind::Paragraph,
            BlockContent::BulletList { .. } => BlockKind::BulletList,
            BlockContent::StatCard { .. } => BlockKind::StatCard,
            BlockContent::StatGrid { .. } => BlockKind::StatGrid,
            BlockContent::Quote { .. } => BlockKind::Quote,
            BlockContent::SpecTable { .. } => BlockKind::SpecTable,
            BlockContent::Callout { .. } => BlockKind::Callout,
            BlockContent::Divider {} => BlockKind::Divider,
            BlockContent::Cta { .. } => BlockKind::Cta,
            BlockContent::Image { .. } => BlockKind::Image,
            BlockContent::Chart { .. } => BlockKind::Chart,
            BlockContent::IdentityCard { .. } => BlockKind::IdentityCard,
            BlockContent::ChallengeSolution { .. } => BlockKind::ChallengeSolution,
            BlockContent::ResultsGrid { .. } => BlockKind::ResultsGrid,
            BlockContent::HeroImage { .. } => BlockKind::HeroImage,
        }
    }

    /// Shallow-merge `patch` into the content object.
    ///
    /// Keys replace whole fields (`{"stat": {...}}` replaces the entire stat).
    /// Keys the kind does not have are dropped. The kind never changes; a
    /// patch that leaves the content unreadable as this kind is an error.
    /// Content goes through JSON, so it must pass [`validate`](Self::validate)
    /// (JSON has no NaN or infinity).
    pub fn patched(&self, patch: &ContentPatch) -> ModelResult<BlockContent> {
        let kind = self.kind();
        let mut value = serde_json::to_value(self)?;

        let fields = value
            .get_mut("content")
            .and_then(Value::as_object_mut)
            .ok_or_else(|| ModelError::PatchMismatch {
                kind,
                reason: "content is not an object".to_string(),
            })?;

        for (key, field) in patch.iter() {
            fields.insert(key.clone(), field.clone());
        }

        serde_json::from_value(value).map_err(|e| ModelError::PatchMismatch {
            kind,
            reason: e.to_string(),
        })
    }

    /// Check values JSON cannot represent. Chart values must be finite.
    pub fn validate(&self) -> ModelResult<()> {
        if let BlockContent::Chart { chart } = self {
            if let Some(point) = chart.series.iter().find(|p| !p.value.is_finite()) {
                return Err(ModelError::NonFiniteValue {
                    label: point.label.clone(),
                });
            }
        }
        Ok(())
    }

    /// Short single-line text used in outlines
    pub fn preview(&self) -> String {
        match self {
            BlockContent::Heading { text, level } => format!("h{} {}", level, text),
            BlockContent::Subheading { text }
            | BlockContent::Paragraph { text }
            | BlockContent::Callout { text, .. }
            | BlockContent::Cta { text, .. } => text.clone(),
            BlockContent::BulletList { items } => format!("{} items", items.len()),
            BlockContent::StatCard { stat } => format!("{} {}", stat.value, stat.label),
            BlockContent::StatGrid { stats } | BlockContent::ResultsGrid { results: stats } => {
                format!("{} stats", stats.len())
            }
            BlockContent::Quote { quote } => format!("\"{}\" - {}", quote.text, quote.author),
            BlockContent::SpecTable { rows } => format!("{} rows", rows.len()),
            BlockContent::Divider {} => String::new(),
            BlockContent::Image { src, alt, .. } => {
                if alt.is_empty() {
                    src.clone()
                } else {
                    alt.clone()
                }
            }
            BlockContent::Chart { chart } => chart.title.clone(),
            BlockContent::IdentityCard { company, .. } => company.clone(),
            BlockContent::ChallengeSolution { challenge, .. } => challenge.clone(),
            BlockContent::HeroImage { title, .. } => title.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextSize {
    Small,
    Medium,
    Large,
}

/// Presentation hints; never affects editing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<TextSize>,
}

impl BlockStyle {
    pub fn aligned(align: Align) -> Self {
        Self {
            align: Some(align),
            ..Self::default()
        }
    }

    /// Overwrite every field that is set in `patch`
    pub fn merge(&mut self, patch: &BlockStyle) {
        if let Some(align) = patch.align {
            self.align = Some(align);
        }
        if let Some(color) = &patch.color {
            self.color = Some(color.clone());
        }
        if let Some(background) = &patch.background {
            self.background = Some(background.clone());
        }
        if let Some(size) = patch.size {
            self.size = Some(size);
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &BlockStyle::default()
    }
}

/// A content block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(flatten)]
    pub content: BlockContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<BlockStyle>,
}

impl Block {
    pub fn new(id: impl Into<String>, content: BlockContent) -> Self {
        Self {
            id: id.into(),
            content,
            style: None,
        }
    }

    pub fn with_style(mut self, style: BlockStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn kind(&self) -> BlockKind {
        self.content.kind()
    }

    /// Deep copy under a new id
    pub fn duplicate(&self, new_id: impl Into<String>) -> Self {
        Self {
            id: new_id.into(),
            content: self.content.clone(),
            style: self.style.clone(),
        }
    }

    /// Merge `style` into the block's style, creating it if absent
    pub fn merge_style(&mut self, style: &BlockStyle) {
        self.style.get_or_insert_with(BlockStyle::default).merge(style);
    }
}
