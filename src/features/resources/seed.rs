//! Sample data for local development (`resource-service seed`).

use std::collections::BTreeSet;

use crate::features::resources::models::resource::ResourceStatus::{self, Active, Inactive};
use crate::features::resources::models::NewResource;
use crate::features::resources::repositories::ResourceRepository;

const SAMPLE_RESOURCES: &[(&str, &str, &str, ResourceStatus)] = &[
    (
        "MacBook Pro 16-inch",
        "High-performance laptop with 32GB RAM and 1TB SSD for development and design work.",
        "electronics",
        Active,
    ),
    (
        "Dell UltraSharp 4K Monitor",
        "27-inch 4K USB-C monitor with accurate color for design work and productivity.",
        "electronics",
        Active,
    ),
    (
        "Noise-cancelling Headphones",
        "Wireless over-ear headphones with 30-hour battery life.",
        "electronics",
        Active,
    ),
    (
        "iPad Pro 12.9",
        "Tablet with stylus support for digital art and note-taking.",
        "electronics",
        Inactive,
    ),
    (
        "Herman Miller Aeron Chair",
        "Ergonomic office chair with lumbar support and breathable mesh.",
        "furniture",
        Active,
    ),
    (
        "Standing Desk Converter",
        "Height-adjustable converter that turns any desk into a sit-stand workstation.",
        "furniture",
        Active,
    ),
    (
        "Steelcase Think Chair",
        "Office chair with responsive back support built from recycled materials.",
        "furniture",
        Inactive,
    ),
    (
        "Figma Pro Subscription",
        "Design tool subscription for UI/UX design, prototyping and collaboration.",
        "software",
        Active,
    ),
    (
        "JetBrains IntelliJ IDEA",
        "IDE for Java, Kotlin and other JVM languages.",
        "software",
        Active,
    ),
    (
        "Slack Professional",
        "Team chat with unlimited history, file sharing and integrations.",
        "software",
        Inactive,
    ),
    (
        "Moleskine Notebook Set",
        "Hardcover dotted notebooks with elastic closure and ribbon bookmark.",
        "office-supplies",
        Active,
    ),
    (
        "Pilot G2 Pen Pack",
        "Smooth gel ink pens with a comfortable grip for everyday writing.",
        "office-supplies",
        Active,
    ),
    (
        "Clean Code by Robert Martin",
        "Programming book on writing maintainable, readable code.",
        "books",
        Active,
    ),
    (
        "JavaScript: The Good Parts",
        "Concise guide to the most useful parts of JavaScript.",
        "books",
        Inactive,
    ),
    (
        "Ubiquiti UniFi Access Point",
        "Wi-Fi 6 access point with centralized management.",
        "networking",
        Active,
    ),
    (
        "USB-C Hub with HDMI",
        "Multi-port hub with USB-A, USB-C, HDMI and SD card slots.",
        "accessories",
        Active,
    ),
    (
        "Synology NAS DS220+",
        "Network-attached storage for file sharing, backup and media streaming.",
        "storage",
        Active,
    ),
    (
        "Blue Light Blocking Glasses",
        "Computer glasses that reduce eye strain during long screen sessions.",
        "health",
        Active,
    ),
];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub created: usize,
    pub failed: usize,
    pub active: usize,
    pub inactive: usize,
    pub categories: BTreeSet<String>,
}

/// Insert every sample resource. A failed insert is logged and skipped.
pub async fn seed_resources(repository: &ResourceRepository) -> SeedSummary {
    let mut summary = SeedSummary::default();
    let total = SAMPLE_RESOURCES.len();

    for (index, (name, description, category, status)) in SAMPLE_RESOURCES.iter().enumerate() {
        let input = NewResource {
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            status: *status,
        };

        match repository.create(input).await {
            Ok(resource) => {
                tracing::info!("Created resource {}/{}: {}", index + 1, total, resource.name);
                summary.created += 1;
                summary.categories.insert(resource.category);
                match resource.status {
                    Active => summary.active += 1,
                    Inactive => summary.inactive += 1,
                }
            }
            Err(e) => {
                tracing::error!("Failed to create resource {}: {}: {}", index + 1, name, e);
                summary.failed += 1;
            }
        }
    }

    summary
}
