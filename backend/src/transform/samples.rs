//! Illustrative values for template sample rows.
//!
//! Static reference data keyed by column path. Columns not listed here get an
//! empty sample.

use std::collections::HashMap;

/// Values shared by every schema.
const COMMON: &[(&str, &str)] = &[
    ("sourceId", "partner123"),
    ("nameFr", "Nom en français"),
    ("nameEn", "Name in English"),
    ("descriptionFr", "Description en français"),
    ("descriptionEn", "Description in English"),
];

const EVENT: &[(&str, &str)] = &[
    ("status", "Scheduled"),
    ("startDate", "2023-08-15"),
    ("endDate", "2023-08-15"),
    ("startTime", "19:30"),
    ("endTime", "22:00"),
    ("placeId", "place123"),
    ("price.type", "range"),
    ("price.currency", "CAD"),
    ("price.minValue", "25.00"),
    ("price.maxValue", "75.00"),
    ("categoryTags", "music,concert,jazz"),
    ("performerNames", "John Smith Quartet,Jane Doe"),
    ("isAccessible", "true"),
    ("accessibilityFeatures", "Wheelchair Access,Assistive Listening Systems"),
    ("images.url", "https://example.com/images/event.jpg"),
    ("images.altText", "Event image description"),
    ("images.width", "1200"),
    ("images.height", "800"),
    ("ticketPurchaseUrl", "https://example.com/tickets"),
];

const PLACE: &[(&str, &str)] = &[
    ("locationType", "Place"),
    ("containedInPlaceStatus", "false"),
    ("addressStreet", "123 Main Street"),
    ("addressCity", "Montréal"),
    ("addressRegion", "QC"),
    ("addressPostalCode", "H2X1Z4"),
    ("addressCountry", "CAN"),
    ("latitude", "45.5088"),
    ("longitude", "-73.5878"),
    ("capacity", "500"),
    ("phoneNumber", "+15141234567"),
    ("emailAddress", "info@example.com"),
    ("websiteUrl", "https://example.com"),
    ("openingHours.Monday.opens", "09:00"),
    ("openingHours.Monday.closes", "17:00"),
    ("openingHours.Tuesday.opens", "09:00"),
    ("openingHours.Tuesday.closes", "17:00"),
    ("openingHours.Wednesday.opens", "09:00"),
    ("openingHours.Wednesday.closes", "17:00"),
    ("openingHours.Thursday.opens", "09:00"),
    ("openingHours.Thursday.closes", "21:00"),
    ("openingHours.Friday.opens", "09:00"),
    ("openingHours.Friday.closes", "21:00"),
    ("openingHours.Saturday.opens", "10:00"),
    ("openingHours.Saturday.closes", "21:00"),
    ("openingHours.Sunday.opens", "10:00"),
    ("openingHours.Sunday.closes", "17:00"),
    (
        "accessibilityFeatures",
        "Wheelchair Access,Accessible Restrooms,Assistive Listening Systems",
    ),
    ("images.url", "https://example.com/images/place.jpg"),
    ("images.altText", "Exterior view of the location"),
    ("images.width", "1200"),
    ("images.height", "800"),
];

/// Sample values for a schema. Schema-specific entries override common ones.
pub fn sample_values(schema_name: &str) -> HashMap<String, String> {
    let specific: &[(&str, &str)] = match schema_name {
        "event" => EVENT,
        "place" => PLACE,
        _ => &[],
    };

    let mut samples: HashMap<String, String> = COMMON
        .iter()
        .chain(specific)
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    samples.insert("id".to_string(), format!("{}123", schema_name));
    samples
}
