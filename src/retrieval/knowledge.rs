use super::store::KitchenDoc;

/// The built-in knowledge base. Small by design: the retriever embeds every
/// entry at startup and scans them all per query.
pub fn builtin_knowledge() -> Vec<KitchenDoc> {
    let entries: &[(&str, &str, &str)] = &[
        (
            "nasi-goreng",
            "Nasi goreng basics",
            "Nasi goreng is Indonesian fried rice. Use day-old jasmine rice so the grains \
             stay separate, fry over the highest heat you have, and season with sweet soy \
             sauce (kecap manis), shallots, garlic, and a little shrimp paste. Finish with \
             a fried egg on top and fried shallots.",
        ),
        (
            "rendang",
            "Beef rendang",
            "Rendang is a slow dry curry from West Sumatra. Simmer beef chuck in coconut \
             milk with a paste of shallot, garlic, galangal, ginger, lemongrass, and chili \
             for three to four hours, stirring more often as the liquid reduces. It is done \
             when the oil splits out and the meat is mahogany brown.",
        ),
        (
            "coconut-milk",
            "Working with coconut milk",
            "Coconut milk splits when boiled hard; keep curries at a gentle simmer. For \
             richer dishes use the thick cream from the top of the can first to fry the \
             spice paste, then add the thin milk. Shake the can only if the recipe wants \
             them combined.",
        ),
        (
            "rice-ratio",
            "Rice to water ratios",
            "For jasmine rice in a pot, use 1 part rice to 1.25 parts water by volume, \
             rinse until the water runs clear, bring to a boil, then cover on the lowest \
             heat for 12 minutes and rest 10 off the heat. Brown rice wants closer to \
             1 to 1.75 and 35 minutes.",
        ),
        (
            "sambal",
            "Sambal oelek and friends",
            "A basic sambal is red chilies, salt, and a splash of vinegar pounded to a \
             rough paste. For sambal terasi, toast shrimp paste before pounding it in with \
             the chilies and add palm sugar and lime. Fry sambal in oil until it darkens to \
             deepen the flavor and mellow the raw heat.",
        ),
        (
            "wok-heat",
            "Wok heat and wok hei",
            "Stir-frying wants the wok smoking hot before the oil goes in. Cook in small \
             batches so the pan never cools, keep ingredients moving, and add sauces down \
             the side of the wok so they sizzle. The slightly smoky taste this produces is \
             called wok hei.",
        ),
        (
            "satay",
            "Satay and peanut sauce",
            "Marinate chicken thigh in turmeric, coriander, lemongrass, and sweet soy for \
             at least two hours. Thread onto soaked bamboo skewers and grill hot and fast. \
             The peanut sauce is fried peanut paste, palm sugar, tamarind, and chili \
             loosened with coconut milk.",
        ),
        (
            "fish-sauce",
            "Seasoning with fish sauce",
            "Fish sauce brings salt and umami at once; start with less than you think and \
             add at the end of cooking. It mellows considerably once heated. Pair it with \
             lime juice and sugar to balance salty, sour, and sweet in dressings like \
             nuoc cham.",
        ),
        (
            "tempeh",
            "Cooking tempeh",
            "Tempeh benefits from a 10 minute steam or simmer in seasoned water before \
             frying; it loses bitterness and drinks up marinade. For tempeh goreng, \
             marinate in garlic, coriander, and salt water, then shallow-fry until \
             golden and crisp.",
        ),
        (
            "knife-rust",
            "Caring for carbon steel knives",
            "Carbon steel knives and woks rust if left wet. Wash and dry them immediately, \
             wipe knives with a thin film of neutral oil before storage, and re-season a \
             wok by heating it dry and rubbing in oil until it smokes.",
        ),
        (
            "stock",
            "Quick Asian chicken stock",
            "Simmer chicken bones with smashed ginger, scallion whites, and a splash of \
             rice wine for 45 minutes, skimming the first foam. Never boil hard if you \
             want a clear stock. Salt only when the stock is used, not when it is made.",
        ),
        (
            "frying-oil",
            "Choosing and reusing frying oil",
            "Use a neutral oil with a high smoke point (peanut, canola, rice bran) for \
             deep frying at 170 to 180 degrees celsius. Strain cooled oil through a fine \
             sieve and reuse it two or three times at most; discard it once it smells \
             fishy or smokes early.",
        ),
    ];

    entries
        .iter()
        .map(|(id, title, text)| KitchenDoc {
            id: id.to_string(),
            title: title.to_string(),
            text: text.to_string(),
        })
        .collect()
}
