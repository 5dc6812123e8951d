/// Demonstration items used to populate an empty or unreadable catalog

use chrono::{TimeZone, Utc};

use super::data::Item;

fn unsplash(photo: &str) -> String {
    format!("https://images.unsplash.com/photo-{}?w=500&h=500&fit=crop", photo)
}

fn seed_item(
    id: &str,
    name: &str,
    item_type: &str,
    description: &str,
    photos: [&str; 2],
    (year, month, day): (i32, u32, u32),
) -> Item {
    Item {
        id: id.to_string(),
        name: name.to_string(),
        item_type: item_type.to_string(),
        description: description.to_string(),
        cover_image: unsplash(photos[0]),
        additional_images: photos.iter().map(|photo| unsplash(photo)).collect(),
        created_at: Utc
            .with_ymd_and_hms(year, month, day, 0, 0, 0)
            .single()
            .unwrap_or_default(),
    }
}

/// The four seed items, newest first
pub fn seed_items() -> Vec<Item> {
    vec![
        seed_item(
            "1",
            "Classic Cotton T-Shirt",
            "Shirt",
            "A comfortable and versatile cotton t-shirt perfect for everyday wear. \
             Made from 100% organic cotton with a relaxed fit.",
            ["1521572163474-6864f9cf17ab", "1527719327859-c6ce80353573"],
            (2024, 1, 15),
        ),
        seed_item(
            "2",
            "Denim Jeans",
            "Pant",
            "Premium quality denim jeans with a modern slim fit. \
             Features classic five-pocket styling and durable construction.",
            ["1542272604-787c3835535d", "1506629905057-f39b5b0d0b2b"],
            (2024, 1, 10),
        ),
        seed_item(
            "3",
            "Running Sneakers",
            "Shoes",
            "High-performance running shoes with advanced cushioning technology. \
             Perfect for daily runs and athletic activities.",
            ["1460353581641-37baddab0fa2", "1552346989-e069318e20a5"],
            (2024, 1, 5),
        ),
        seed_item(
            "4",
            "Yoga Mat",
            "Sports Gear",
            "Premium non-slip yoga mat made from eco-friendly materials. \
             Perfect for yoga, pilates, and fitness exercises.",
            ["1506629905057-f39b5b0d0b2b", "1571019613454-1cb2f99b2d8b"],
            (2024, 1, 1),
        ),
    ]
}
