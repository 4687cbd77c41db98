//! The closed crop label table.
//!
//! The classifier emits integer codes 1..=22; everything user-facing (names,
//! image assets, the description page, search) derives from this table.

/// Label rendered for codes the table does not know.
pub const UNKNOWN_CROP: &str = "Unknown Crop";

/// Crop names indexed by `code - 1`. The numbering is fixed by the training
/// run that produced the classifier.
pub const CROP_NAMES: [&str; 22] = [
    "Rice",
    "Maize",
    "Jute",
    "Cotton",
    "Coconut",
    "Papaya",
    "Orange",
    "Apple",
    "Muskmelon",
    "Watermelon",
    "Grapes",
    "Mango",
    "Banana",
    "Pomegranate",
    "Lentil",
    "Blackgram",
    "Mungbean",
    "Mothbeans",
    "Pigeonpeas",
    "Kidneybeans",
    "Chickpea",
    "Coffee",
];

/// Map a classifier code to its crop name, degrading to the sentinel for
/// codes outside the table.
pub fn label_for_code(code: i64) -> &'static str {
    if (1..=CROP_NAMES.len() as i64).contains(&code) {
        CROP_NAMES[(code - 1) as usize]
    } else {
        UNKNOWN_CROP
    }
}

/// Derived display asset: lower-cased label plus the fixed image suffix.
pub fn image_file(label: &str) -> String {
    format!("{}.jpg", label.to_lowercase())
}

/// Case-insensitive substring filter over the crop names.
pub fn search(query: &str) -> Vec<&'static str> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    CROP_NAMES
        .iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .copied()
        .collect()
}

/// Static reference data for the description page.
#[derive(Debug, Clone)]
pub struct CropProfile {
    pub name: &'static str,
    pub conditions: &'static str,
    pub benefits: &'static str,
}

pub const CROP_PROFILES: [CropProfile; 22] = [
    CropProfile {
        name: "rice",
        conditions: "Hot and humid climate with plenty of water.",
        benefits: "Staple food rich in carbohydrates.",
    },
    CropProfile {
        name: "maize",
        conditions: "Warm climate with moderate rainfall.",
        benefits: "Used for food, feed, and industrial products.",
    },
    CropProfile {
        name: "chickpea",
        conditions: "Cool, dry climate with good sunlight.",
        benefits: "High in protein and fiber.",
    },
    CropProfile {
        name: "kidneybeans",
        conditions: "Warm days and cool nights.",
        benefits: "Good for heart and rich in protein.",
    },
    CropProfile {
        name: "pigeonpeas",
        conditions: "Semi-arid climate, well-drained soil.",
        benefits: "Rich in protein and fiber.",
    },
    CropProfile {
        name: "mothbeans",
        conditions: "Hot and arid conditions.",
        benefits: "Excellent drought resistance.",
    },
    CropProfile {
        name: "mungbean",
        conditions: "Hot, dry regions.",
        benefits: "Easily digestible protein.",
    },
    CropProfile {
        name: "blackgram",
        conditions: "Warm and humid conditions.",
        benefits: "Promotes bone health.",
    },
    CropProfile {
        name: "lentil",
        conditions: "Cool and dry climate.",
        benefits: "Rich in iron and folate.",
    },
    CropProfile {
        name: "pomegranate",
        conditions: "Hot and dry climate.",
        benefits: "Antioxidant rich and boosts immunity.",
    },
    CropProfile {
        name: "banana",
        conditions: "Tropical humid climate.",
        benefits: "High in potassium and energy.",
    },
    CropProfile {
        name: "mango",
        conditions: "Tropical and subtropical climate.",
        benefits: "Rich in Vitamin A and C.",
    },
    CropProfile {
        name: "grapes",
        conditions: "Moderate temperature with dry soil.",
        benefits: "Rich in antioxidants.",
    },
    CropProfile {
        name: "watermelon",
        conditions: "Warm climate, sandy loam soil.",
        benefits: "Hydrating and low in calories.",
    },
    CropProfile {
        name: "muskmelon",
        conditions: "Warm, sunny climate.",
        benefits: "Good for digestion and hydration.",
    },
    CropProfile {
        name: "apple",
        conditions: "Cold climate, well-drained soil.",
        benefits: "Boosts heart and gut health.",
    },
    CropProfile {
        name: "orange",
        conditions: "Subtropical climate.",
        benefits: "Rich in Vitamin C.",
    },
    CropProfile {
        name: "papaya",
        conditions: "Tropical climate with warm weather.",
        benefits: "Improves digestion and eye health.",
    },
    CropProfile {
        name: "coconut",
        conditions: "Humid coastal regions.",
        benefits: "Good source of healthy fats.",
    },
    CropProfile {
        name: "cotton",
        conditions: "Warm climate, light soil.",
        benefits: "Used in textiles and oils.",
    },
    CropProfile {
        name: "jute",
        conditions: "Warm, humid climate.",
        benefits: "Eco-friendly fiber crop.",
    },
    CropProfile {
        name: "coffee",
        conditions: "Cool tropical climate.",
        benefits: "Rich in antioxidants and energy boosting.",
    },
];
