use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    static ref SUBSTITUTIONS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert(
            "buttermilk",
            "1 cup milk plus 1 tbsp lime juice or vinegar, rested for 10 minutes",
        );
        m.insert(
            "coconut milk",
            "equal parts whole milk with 1 tsp coconut oil per cup, or unsweetened coconut cream thinned with water",
        );
        m.insert(
            "palm sugar",
            "dark brown sugar in equal amounts, with a drop of maple syrup for depth",
        );
        m.insert(
            "tamarind paste",
            "equal parts lime juice and brown sugar",
        );
        m.insert(
            "fish sauce",
            "light soy sauce with a pinch of salt; add a little miso for the missing funk",
        );
        m.insert(
            "lemongrass",
            "zest of half a lemon per stalk, added late in the cooking",
        );
        m.insert(
            "kaffir lime leaves",
            "lime zest plus a small bay leaf per 2 leaves",
        );
        m.insert(
            "galangal",
            "fresh ginger with a squeeze of lime, slightly less than the galangal amount",
        );
        m.insert(
            "shrimp paste",
            "fish sauce reduced until thick, or a mashed anchovy fillet",
        );
        m.insert(
            "candlenut",
            "macadamia nuts in equal amounts, lightly toasted",
        );
        m.insert(
            "rice vinegar",
            "apple cider vinegar diluted with a splash of water",
        );
        m.insert(
            "sweet soy sauce",
            "soy sauce simmered with an equal volume of palm or brown sugar",
        );
        m
    };
}

/// Looks up a kitchen substitution for an ingredient. Lookup is
/// case-insensitive and tolerant of surrounding whitespace.
pub fn substitute_ingredient(name: &str) -> Option<&'static str> {
    let key = name.trim().to_lowercase();
    SUBSTITUTIONS.get(key.as_str()).copied()
}

/// All ingredients the substitution table knows about, sorted for display.
pub fn known_ingredients() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = SUBSTITUTIONS.keys().copied().collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_substitution() {
        let sub = substitute_ingredient("buttermilk").unwrap();
        assert!(sub.contains("milk"));
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert!(substitute_ingredient("  Palm Sugar ").is_some());
    }

    #[test]
    fn test_unknown_ingredient() {
        assert!(substitute_ingredient("unicorn tears").is_none());
    }

    #[test]
    fn test_known_ingredients_sorted() {
        let names = known_ingredients();
        assert!(!names.is_empty());
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
