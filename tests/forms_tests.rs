mod common;

#[cfg(test)]
pub mod forms_tests {
    use chrono::{TimeZone, Utc};

    use super::common::*;

    use jglobal_site::common::FormError;
    use jglobal_site::forms::*;
    use jglobal_site::models::{BlogStatus, ListingStatus};

    fn listing() -> ListingFields {
        ListingFields {
            title: "Lekki Gardens".into(),
            description: "Dry land with C of O".into(),
            location: location(),
            status: ListingStatus::Available,
            category: Some("Residential".into()),
            features: vec!["Fenced".into(), "  ".into(), "Gated".into()],
            units: vec![unit(300.0, 12_000_000.0), unit(600.0, 22_000_000.0)],
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  Lekki Phase 1: Plots & Homes! "), "lekki-phase-1-plots-homes");
        assert_eq!(slugify("***"), "");
        assert!(validate_slug(&slugify("Ibeju-Lekki   Estate")));
    }

    #[test]
    fn test_resolve_slug_prefers_valid_explicit_slug() {
        assert_eq!(resolve_slug(Some("my-slug"), "Title").unwrap(), "my-slug");
        assert_eq!(resolve_slug(Some("  "), "New Title").unwrap(), "new-title");
        assert!(matches!(
            resolve_slug(Some("Bad Slug"), "Title"),
            Err(FormError::Invalid { field: "slug", .. })
        ));
        assert_eq!(resolve_slug(None, "!!!"), Err(FormError::Required("slug")));
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("info@jglobalproperties.com"));
        assert!(!validate_email("info@localhost"));
        assert!(!validate_email("@jglobal.com"));
        assert!(!validate_email("a@b@c.com"));
        assert!(!validate_email("info@.com"));
    }

    #[test]
    fn test_listing_requires_units() {
        assert!(listing().validate().is_ok());

        let no_units = ListingFields {
            units: vec![],
            ..listing()
        };
        assert_eq!(no_units.validate(), Err(FormError::Required("units")));

        let mut bad_unit = listing();
        bad_unit.units[1].size = 0.0;
        assert!(matches!(bad_unit.validate(), Err(FormError::Invalid { field: "units", .. })));

        let mut far_away = listing();
        far_away.location.latitude = Some(120.0);
        assert!(matches!(far_away.validate(), Err(FormError::Invalid { field: "latitude", .. })));
    }

    #[test]
    fn test_listing_indexed_fields() {
        let form = LandForm { listing: listing() };
        let fields = form.fields();

        assert_eq!(fields.get("title"), Some("Lekki Gardens"));
        assert_eq!(fields.get("status"), Some("AVAILABLE"));
        assert_eq!(fields.get("features[0]"), Some("Fenced"));
        assert_eq!(fields.get("features[1]"), Some("Gated"));
        assert_eq!(fields.get("features[2]"), None);
        assert_eq!(fields.get("units[1][size]"), Some("600"));
        assert_eq!(fields.get("units[1][available]"), Some("true"));
        assert_eq!(fields.get("units[0][id]"), None);
    }

    #[test]
    fn test_house_adds_its_own_fields() {
        let form = HouseForm {
            listing: listing(),
            property_type: Some("Duplex".into()),
            bedrooms: Some(4),
            bathrooms: None,
        };
        let fields = form.fields();
        assert_eq!(fields.get("propertyType"), Some("Duplex"));
        assert_eq!(fields.get("bedrooms"), Some("4"));
        assert_eq!(fields.get("bathrooms"), None);
    }

    #[test]
    fn test_push_opt_skips_blank_values() {
        let mut fields = IndexedFields::new();
        fields
            .push_opt("a", Some("  "))
            .push_opt::<&str>("b", None)
            .push_opt("c", Some("x"));
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.fields()[0], ("c".to_string(), "x".to_string()));
    }

    #[test]
    fn test_scheduled_blog_needs_a_time() {
        let mut form = BlogForm {
            title: "Why Lekki".into(),
            content: "<p>Because</p>".into(),
            status: BlogStatus::Scheduled,
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(FormError::Required("scheduledAt")));

        form.scheduled_at = Some(Utc.with_ymd_and_hms(2026, 11, 1, 9, 0, 0).unwrap());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_blog_body_is_json_without_cover() {
        let form = BlogForm {
            title: "Why Lekki".into(),
            content: "<p>Because</p>".into(),
            tag_ids: vec!["t1".into(), "t1".into(), " ".into(), "t2".into()],
            scheduled_at: Some(Utc.with_ymd_and_hms(2026, 11, 1, 9, 0, 0).unwrap()),
            ..Default::default()
        };

        match form.body().unwrap() {
            FormBody::Json(json) => {
                assert_eq!(json["slug"], "why-lekki");
                assert_eq!(json["tags"], serde_json::json!(["t1", "t2"]));
                assert!(json["scheduledAt"].is_null());
            }
            FormBody::Multipart(_) => panic!("expected a JSON body"),
        }

        let with_cover = BlogForm {
            cover: Some(upload("cover.jpg")),
            ..form
        };
        assert!(with_cover.body().unwrap().is_multipart());
    }

    #[test]
    fn test_event_requires_date() {
        let mut form = EventForm {
            title: "Open house".into(),
            description: "<p>Tour</p>".into(),
            location: "Ikoyi".into(),
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(FormError::Required("date")));

        form.date = Some(Utc.with_ymd_and_hms(2026, 12, 5, 10, 0, 0).unwrap());
        assert!(form.validate().is_ok());
        assert!(!form.body().unwrap().is_multipart());

        form.images.push(upload("flyer.jpg"));
        assert!(form.body().unwrap().is_multipart());
    }

    #[test]
    fn test_taxonomy_bodies() {
        let category = CategoryForm {
            name: " Real Estate Tips ".into(),
            slug: None,
            description: Some("  ".into()),
        };
        assert!(category.validate().is_ok());
        let body = category.body();
        assert_eq!(body["name"], "Real Estate Tips");
        assert_eq!(body["slug"], "real-estate-tips");
        assert!(body["description"].is_null());

        let tag = TagForm {
            name: "".into(),
            slug: None,
        };
        assert_eq!(tag.validate(), Err(FormError::Required("name")));
    }
}
