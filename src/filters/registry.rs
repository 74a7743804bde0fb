//! Filter trait, metadata, and the filter registry.
//!
//! The registry is an ordered mapping from filter id to filter instance,
//! built once at startup. Registration order is iteration order, which the
//! batch driver relies on for deterministic per-image logs and summaries.

use crate::core::error::FilterResult;
use image::DynamicImage;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Category for organizing filters in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Contrast and tonal operations
    Contrast,
    /// Color manipulation
    Color,
    /// Blur effects
    Blur,
    /// Stylization effects
    Stylize,
    /// Geometric transformations
    Transform,
}

impl Category {
    /// Get the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Contrast => "Contrast",
            Category::Color => "Color",
            Category::Blur => "Blur",
            Category::Stylize => "Stylize",
            Category::Transform => "Transform",
        }
    }
}

/// Metadata describing a filter.
///
/// The `id` doubles as the output filename suffix: an input `photo.jpg`
/// processed by the filter with id `sepia` produces `photo_sepia.jpg`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterMetadata {
    /// Unique identifier and output filename suffix (e.g. "sepia").
    pub id: String,
    /// Human-readable name (e.g. "Sepia Tone").
    pub name: String,
    /// Category for listings.
    pub category: Category,
    /// Detailed description.
    pub description: String,
}

impl FilterMetadata {
    /// Create metadata with an empty description.
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            description: String::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A pure image transform.
///
/// Filters are stateless and deterministic: the same input image (and, for
/// the seeded vintage grain, the same seed) always yields a byte-identical
/// output. A filter never mutates its input; `apply` allocates a new image,
/// possibly with a different channel count or width.
///
/// Grayscale inputs are auto-promoted and color inputs auto-reduced: every
/// filter converts the incoming [`DynamicImage`] to the representation it
/// needs (`to_rgb8` / `to_luma8`) before touching pixels.
pub trait Filter: Send + Sync {
    /// Describe this filter.
    fn metadata(&self) -> FilterMetadata;

    /// Apply the filter, producing a new image.
    fn apply(&self, image: &DynamicImage) -> FilterResult<DynamicImage>;
}

/// Registry entry containing a filter instance and its cached metadata.
pub struct RegistryEntry {
    /// The filter instance.
    pub filter: Box<dyn Filter>,
    /// Cached metadata (avoids re-deriving it on every lookup).
    pub metadata: FilterMetadata,
    /// Whether this filter participates in batch runs.
    pub enabled: bool,
}

/// Ordered registry of all available filters.
///
/// Built once at process start and read-only afterwards as far as the batch
/// driver is concerned. Iteration order is registration order.
pub struct FilterRegistry {
    /// Filters indexed by their unique id.
    filters: IndexMap<String, RegistryEntry>,
    /// Filter ids grouped by category, in registration order.
    categories: IndexMap<Category, Vec<String>>,
}

impl FilterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            filters: IndexMap::new(),
            categories: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with the built-in filter catalog.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::filters::builtin::register_all(&mut registry);
        registry
    }

    /// Register a filter instance.
    pub fn register<F>(&mut self, filter: F)
    where
        F: Filter + 'static,
    {
        let metadata = filter.metadata();
        let id = metadata.id.clone();
        let category = metadata.category;

        let entry = RegistryEntry {
            filter: Box::new(filter),
            metadata,
            enabled: true,
        };

        self.filters.insert(id.clone(), entry);

        self.categories.entry(category).or_default().push(id);
    }

    /// Get a filter by id, if registered and enabled.
    pub fn get(&self, id: &str) -> Option<&dyn Filter> {
        self.filters
            .get(id)
            .filter(|e| e.enabled)
            .map(|e| e.filter.as_ref())
    }

    /// Get metadata for a filter regardless of enablement.
    pub fn get_metadata(&self, id: &str) -> Option<&FilterMetadata> {
        self.filters.get(id).map(|e| &e.metadata)
    }

    /// Check if a filter is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.filters.contains_key(id)
    }

    /// Get all registered filter ids in registration order.
    pub fn filter_ids(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(|s| s.as_str())
    }

    /// Iterate over all entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &RegistryEntry)> {
        self.filters.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Get filter ids by category, in registration order.
    pub fn filters_by_category(&self, category: Category) -> Vec<&str> {
        self.categories
            .get(&category)
            .map(|ids| ids.iter().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    /// Get enabled filters grouped by category for listings.
    pub fn grouped_by_category(&self) -> IndexMap<Category, Vec<&FilterMetadata>> {
        let mut grouped: IndexMap<Category, Vec<&FilterMetadata>> = IndexMap::new();

        for entry in self.filters.values() {
            if entry.enabled {
                grouped
                    .entry(entry.metadata.category)
                    .or_default()
                    .push(&entry.metadata);
            }
        }

        grouped
    }

    /// Enable or disable a filter. Returns false if the id is unknown.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        if let Some(entry) = self.filters.get_mut(id) {
            entry.enabled = enabled;
            true
        } else {
            false
        }
    }

    /// Get the total number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Get the count of enabled filters.
    pub fn enabled_count(&self) -> usize {
        self.filters.values().filter(|e| e.enabled).count()
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
