// Keyword-based auto-categorisation.
// Rules are data: an ordered table of (label, keyword substrings), checked
// in declaration order with first match winning. The order is part of the
// contract, so identical descriptions always land in the same category.

/// Category assigned when no keyword matches.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Ordered category table. Keywords are lowercase substrings matched
/// against the lowercased description.
const CATEGORY_KEYWORDS: [(&str, &[&str]); 6] = [
    (
        "Food",
        &[
            "grocer", "supermarket", "restaurant", "cafe", "coffee", "lunch",
            "dinner", "breakfast", "pizza", "bread", "takeout", "bakery",
        ],
    ),
    (
        "Transport",
        &[
            "uber", "lyft", "taxi", "bus", "train", "metro", "fuel", "petrol",
            "parking", "gas station",
        ],
    ),
    (
        "Entertainment",
        &[
            "movie", "cinema", "netflix", "spotify", "concert", "game",
            "theatre", "streaming",
        ],
    ),
    (
        "Utilities",
        &[
            "electric", "water bill", "internet", "phone bill", "rent",
            "heating", "utility",
        ],
    ),
    (
        "Health",
        &[
            "pharmacy", "doctor", "dentist", "hospital", "gym", "medicine",
            "clinic",
        ],
    ),
    (
        "Shopping",
        &["amazon", "clothes", "clothing", "mall", "shoes", "electronics"],
    ),
];

/// Map a free-text description to a category label.
/// First category (in table order) with a keyword hit wins; descriptions
/// matching nothing fall back to [`FALLBACK_CATEGORY`].
pub fn categorize(description: &str) -> &'static str {
    let haystack = description.to_lowercase();
    for (label, keywords) in CATEGORY_KEYWORDS.iter() {
        if keywords.iter().any(|keyword| haystack.contains(keyword)) {
            return label;
        }
    }
    FALLBACK_CATEGORY
}
