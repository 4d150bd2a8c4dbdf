//! Demo catalogue loaded into an empty store.

use crate::records::{ItemStatus, NewItem};
use crate::{ItemStore, StoreError};

struct SampleItem {
    name: &'static str,
    category: &'static str,
    description: &'static str,
    location: &'static str,
    date_found: &'static str,
    photo_url: &'static str,
    quantity: u32,
    item_detail: &'static str,
}

const AIRPODS: &str = "Apple AirPods";

const SAMPLE_ITEMS: [SampleItem; 12] = [
    SampleItem {
        name: AIRPODS,
        category: "Electronics",
        description: "Multiple Apple AirPods found across campus. Click View Details to see each variant — model, which bud(s), case included, and how many of each are still unclaimed.",
        location: "Various Locations on Campus",
        date_found: "2026-02-10",
        photo_url: "https://images.unsplash.com/photo-1590658268037-6bf12165a8df?w=600&q=80",
        quantity: 5,
        item_detail: "Brand: Apple · Multiple models · See variants below",
    },
    SampleItem {
        name: "Blue Nike Backpack",
        category: "Bags & Backpacks",
        description: "Large blue Nike Brasilia backpack with a red drawstring keychain. Contains spiral notebooks and a pencil case.",
        location: "Main Hallway — near Lockers B12",
        date_found: "2026-02-11",
        photo_url: "https://images.unsplash.com/photo-1553062407-98eeb64c6a62?w=600&q=80",
        quantity: 1,
        item_detail: "Brand: Nike Brasilia · Color: Blue",
    },
    SampleItem {
        name: "TI-84 Plus CE Calculator",
        category: "Electronics",
        description: "Black Texas Instruments TI-84 Plus CE graphing calculator. Name written in marker on back: J. Morris.",
        location: "Math Department — Room 112",
        date_found: "2026-02-13",
        photo_url: "https://images.unsplash.com/photo-1611532736597-de2d4265fba3?w=600&q=80",
        quantity: 2,
        item_detail: "Model: TI-84 Plus CE · Color: Black",
    },
    SampleItem {
        name: "Green Hydro Flask (32oz)",
        category: "Water Bottles",
        description: "32oz Hydro Flask in forest green with stickers on the side — sunflower and mountain.",
        location: "Library — Study Room 2",
        date_found: "2026-02-10",
        photo_url: "https://images.unsplash.com/photo-1602143407151-7111542de6e8?w=600&q=80",
        quantity: 1,
        item_detail: "Brand: Hydro Flask · Size: 32oz · Color: Forest Green",
    },
    SampleItem {
        name: "Black Champion Zip Hoodie",
        category: "Clothing & Apparel",
        description: "Black Champion zip-up hoodie, size Medium. Left on a cafeteria chair after lunch.",
        location: "Cafeteria — Table Area",
        date_found: "2026-02-12",
        photo_url: "https://images.unsplash.com/photo-1556821840-3a63f15732ce?w=600&q=80",
        quantity: 1,
        item_detail: "Brand: Champion · Color: Black · Size: Medium",
    },
    SampleItem {
        name: "Set of House Keys",
        category: "Keys",
        description: "Set of 3 keys on a silver ring with a small blue star-shaped rubber keychain.",
        location: "Front Office — Main Entrance",
        date_found: "2026-02-09",
        photo_url: "https://images.unsplash.com/photo-1558618666-fcd25c85cd64?w=600&q=80",
        quantity: 1,
        item_detail: "Keys: 3 total · Keychain: Blue star",
    },
    SampleItem {
        name: "Adidas Soccer Cleats",
        category: "Sports Equipment",
        description: "Black and white Adidas Copa soccer cleats, men's size 10. Found near equipment room.",
        location: "Athletic Fields — Equipment Room",
        date_found: "2026-02-11",
        photo_url: "https://images.unsplash.com/photo-1511886929837-354d827aae26?w=600&q=80",
        quantity: 1,
        item_detail: "Brand: Adidas Copa · Size: Men's 10",
    },
    SampleItem {
        name: "Gold Heart Charm Bracelet",
        category: "Jewelry & Accessories",
        description: "Thin gold chain bracelet with a small heart charm. Found on the gymnasium floor.",
        location: "Gymnasium — Main Floor",
        date_found: "2026-02-13",
        photo_url: "https://images.unsplash.com/photo-1611591437281-460bfbe1220a?w=600&q=80",
        quantity: 1,
        item_detail: "Material: Gold tone · Charm: Heart",
    },
    SampleItem {
        name: "Ray-Ban Wayfarer Sunglasses",
        category: "Jewelry & Accessories",
        description: "Classic black Ray-Ban Original Wayfarer sunglasses in a soft case.",
        location: "Outdoor Lunch Area — Bench 3",
        date_found: "2026-02-14",
        photo_url: "https://images.unsplash.com/photo-1572635196237-14b3f281503f?w=600&q=80",
        quantity: 1,
        item_detail: "Brand: Ray-Ban · Model: Wayfarer RB2140",
    },
    SampleItem {
        name: "Grey North Face Puffer Jacket",
        category: "Clothing & Apparel",
        description: "Grey North Face Nuptse puffer jacket, size Large. Found hanging on a chair.",
        location: "Upper School — Room 304",
        date_found: "2026-02-15",
        photo_url: "https://images.unsplash.com/photo-1591047139829-d91aecb6caea?w=600&q=80",
        quantity: 1,
        item_detail: "Brand: The North Face · Style: Nuptse · Size: Large",
    },
    SampleItem {
        name: "Apple MacBook USB-C Charger",
        category: "Electronics",
        description: "Apple 65W USB-C MacBook charger with white cable. Found plugged in at the library.",
        location: "Library — Charging Station",
        date_found: "2026-02-16",
        photo_url: "https://images.unsplash.com/photo-1588872657578-7efd1f1555ed?w=600&q=80",
        quantity: 1,
        item_detail: "Brand: Apple · Wattage: 65W · USB-C",
    },
    SampleItem {
        name: "Purple Spiral Notebook",
        category: "Books & Stationery",
        description: "Purple spiral notebook, college ruled. Name inside: A. Chen. History notes throughout.",
        location: "Cafeteria — Table 7",
        date_found: "2026-02-10",
        photo_url: "https://images.unsplash.com/photo-1531346878377-a5be20888e57?w=600&q=80",
        quantity: 1,
        item_detail: "Color: Purple · Ruled: College · Name: A. Chen",
    },
];

const AIRPODS_VARIANTS: [(&str, u32); 5] = [
    ("AirPods Pro 2nd Gen — Left bud only, no case", 1),
    ("AirPods Pro 2nd Gen — Right bud only, no case", 1),
    ("AirPods Pro 2nd Gen — Both buds, no case", 1),
    ("AirPods 3rd Gen — Both buds + MagSafe case", 1),
    ("AirPods 2nd Gen — Left bud only, no case", 1),
];

/// Number of items [`ItemStore::seed_sample_data`] inserts into an empty store.
pub const SAMPLE_ITEM_COUNT: usize = SAMPLE_ITEMS.len();

impl ItemStore {
    /// Load the sample campus catalogue if the store holds no items.
    ///
    /// Returns the number of items inserted (zero when the store was already
    /// populated, so repeated calls are harmless).
    pub fn seed_sample_data(&self) -> Result<usize, StoreError> {
        if !self.list_items(&Default::default())?.is_empty() {
            tracing::debug!("store already populated; skipping sample data");
            return Ok(0);
        }

        for sample in &SAMPLE_ITEMS {
            let record = self.insert_item_with_status(
                NewItem {
                    name: sample.name.to_string(),
                    category: sample.category.to_string(),
                    description: sample.description.to_string(),
                    location: sample.location.to_string(),
                    date_found: sample.date_found.to_string(),
                    photo_url: Some(sample.photo_url.to_string()),
                    quantity: Some(sample.quantity),
                    item_detail: Some(sample.item_detail.to_string()),
                },
                ItemStatus::Approved,
            )?;
            if sample.name == AIRPODS {
                for (variant, quantity) in AIRPODS_VARIANTS {
                    self.add_variant(record.id, variant, quantity)?;
                }
            }
        }

        tracing::info!(items = SAMPLE_ITEM_COUNT, "seeded sample catalogue");
        Ok(SAMPLE_ITEM_COUNT)
    }
}
