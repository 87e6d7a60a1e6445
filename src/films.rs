// ABOUTME: Immutable film catalog mapping manufacturers to their film stocks
// ABOUTME: Backs the cascading dropdown endpoint and server-side pair validation

/// Fixed manufacturer catalog. Extending it is a data edit here, nothing
/// else in the app hardcodes a manufacturer or stock name.
pub const FILM_CATALOG: &[(&str, &[&str])] = &[
    (
        "Kodak",
        &[
            "Portra 160",
            "Portra 400",
            "Portra 800",
            "Tri-X 400",
            "Ektar 100",
            "Gold 200",
            "T-Max 400",
            "T-Max 100",
            "Ektachrome E100",
            "Ultramax 400",
            "Colorplus 200",
            "Kodacolor 200",
            "Kodacolor 100",
        ],
    ),
    ("Fujifilm", &["Velvia 50", "Pro 400H", "Neopan 100 Acros"]),
    ("Ilford", &["HP5 Plus", "Delta 3200", "Pan F Plus"]),
];

/// Title-case a manufacturer name the way the lookup expects it, so
/// "kodak" and "KODAK" both resolve to "Kodak".
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for c in input.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Film stocks for a manufacturer, empty for anything not in the catalog.
pub fn list_film_types(manufacturer: &str) -> &'static [&'static str] {
    let normalized = title_case(manufacturer);
    FILM_CATALOG
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, films)| *films)
        .unwrap_or(&[])
}

/// Server-side check that a submitted film_type belongs to the submitted
/// manufacturer's catalog.
pub fn film_type_valid(manufacturer: &str, film_type: &str) -> bool {
    list_film_types(manufacturer).contains(&film_type)
}
