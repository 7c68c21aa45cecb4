use phonebook_core::{is_valid_phone, Entry, EntryField, EntryPatch, MalformedRecord};

fn sample() -> Entry {
    Entry::new(
        "Doe",
        "John",
        "Richard",
        "Acme",
        "555-123-4567",
        "555-765-4321",
    )
}

#[test]
fn line_round_trip_preserves_every_field() {
    let entries = [
        sample(),
        Entry::default(),
        Entry::new("Иванов", "Иван", "Иванович", "ООО Ромашка", "", "+7 495 123 4567"),
        Entry::new("  padded ", "tab\there", "", "a;b", "1", "2"),
    ];

    for delimiter in ['|', ';'] {
        for entry in &entries {
            if entry.check_encodable(delimiter).is_err() {
                continue;
            }
            let line = entry.to_line(delimiter);
            assert!(line.ends_with('\n'));
            assert_eq!(&Entry::from_line(&line, delimiter).unwrap(), entry);
        }
    }
}

#[test]
fn short_line_is_malformed() {
    let err = Entry::from_line("Doe|John|Richard", '|').unwrap_err();
    assert_eq!(err, MalformedRecord { parts: 3 });
    assert!(err.to_string().contains("expected 6 fields"));
}

#[test]
fn all_empty_patch_leaves_entry_unchanged() {
    let mut entry = sample();
    entry.update(&EntryPatch::new());
    assert_eq!(entry, sample());
}

#[test]
fn full_patch_replaces_every_field() {
    let replacement = Entry::new("Roe", "Jane", "Ann", "Globex", "5551234567", "5557654321");
    let mut entry = sample();
    entry.update(&EntryPatch::from(replacement.clone()));
    assert_eq!(entry, replacement);
}

#[test]
fn typed_accessors_cover_every_field() {
    let mut entry = Entry::default();
    for field in EntryField::ALL {
        entry.set(field, field.key());
    }
    for (field, value) in entry.fields() {
        assert_eq!(value, field.key());
    }
    assert_eq!(entry.office_phone, "office_phone");
}

#[test]
fn phone_grammar_matches_documented_examples() {
    assert!(is_valid_phone("+1(555)123-4567"));
    assert!(is_valid_phone("555-123-4567"));
    assert!(is_valid_phone("5551234567"));
    assert!(!is_valid_phone("abc"));
    assert!(!is_valid_phone(""));
    assert!(!is_valid_phone("12-34"));
}
