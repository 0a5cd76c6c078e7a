use intake_core::{
    CatalogLabels, FavoriteSet, Industry, Locale, LocalizedDirectory, LocalizedFields,
    MatchedResearcher, MatchingId, ProjectDraft, ProjectId, ResearchSession, ResearcherId,
    ResearcherLevel, UniversitySelection,
};
use intake_export::{ExportText, ExportTransform, FILENAME_TITLE_MAX_CHARS};
use intake_test_utils::{complete_draft, sample_catalog, sample_researchers};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn session_for(draft: &ProjectDraft, researchers: Vec<MatchedResearcher>) -> ResearchSession {
    ResearchSession::new(ProjectId(12), draft.title(), draft.clone(), researchers)
}

#[test]
fn project_sheet_rows() {
    let labels = CatalogLabels::new(Locale::Ja);
    let catalog = sample_catalog();
    let text = ExportText::default();
    let draft = complete_draft().with_industry(Industry::Chemicals);
    let session = session_for(&draft, Vec::new());

    let workbook = ExportTransform::new(&labels, &catalog, &text).build(
        &draft,
        &session,
        &FavoriteSet::new(),
    );

    let sheet = workbook.sheet("project info").unwrap();
    assert_eq!(sheet.len(), 6);
    assert_eq!(
        sheet.rows,
        vec![
            vec!["title".to_string(), draft.title().to_string()],
            vec!["background".to_string(), draft.background().to_string()],
            vec!["industry".to_string(), "化学".to_string()],
            vec!["business description".to_string(), "unspecified".to_string()],
            vec!["universities".to_string(), "京都大学/東京大学(2 件)".to_string()],
            vec!["researcher levels".to_string(), "教授/准教授".to_string()],
        ]
    );
}

#[test]
fn absent_industry_and_all_universities() {
    let labels = CatalogLabels::new(Locale::En);
    let catalog = sample_catalog();
    let text = ExportText::default();
    let draft = complete_draft()
        .with_universities(UniversitySelection::All)
        .with_levels(ResearcherLevel::ALL)
        .with_business_description("Battery cells");
    let session = session_for(&draft, Vec::new());

    let workbook =
        ExportTransform::new(&labels, &catalog, &text).build(&draft, &session, &FavoriteSet::new());
    let sheet = &workbook.sheets[0];

    assert_eq!(sheet.cell(2, 1), Some("unspecified"));
    assert_eq!(sheet.cell(3, 1), Some("Battery cells"));
    assert_eq!(sheet.cell(4, 1), Some("All universities (7)"));
    assert_eq!(sheet.cell(5, 1), Some("all levels"));
}

#[test]
fn researcher_rows_follow_session_order_and_favorite_set() {
    let labels = CatalogLabels::new(Locale::Ja);
    let catalog = sample_catalog();
    let text = ExportText::default();
    let draft = complete_draft();

    let mut researchers = sample_researchers(3);
    researchers.reverse();
    // stored status says favorite, live set says otherwise
    researchers[0].favorite_status = true;
    let session = session_for(&draft, researchers);

    let mut favorites = FavoriteSet::new();
    favorites.insert(MatchingId(3), false);
    favorites.insert(MatchingId(2), true);

    let workbook = ExportTransform::new(&labels, &catalog, &text).build(&draft, &session, &favorites);
    let sheet = workbook.sheet("researcher list").unwrap();

    assert_eq!(sheet.len(), 4);
    assert_eq!(sheet.rows[0].len(), 7);
    assert_eq!(sheet.cell(0, 4), Some("profile"));
    assert_eq!(sheet.cell(1, 0), Some("研究者 3"));
    assert_eq!(sheet.cell(1, 6), Some("not registered"));
    assert_eq!(sheet.cell(2, 6), Some("registered"));
    // absent from the set
    assert_eq!(sheet.cell(3, 6), Some("not registered"));
    assert_eq!(
        sheet.cell(1, 4),
        Some("https://nrid.nii.ac.jp/ja/nrid/1000000001003")
    );
}

#[test]
fn missing_fields_and_reasons_use_placeholders() {
    let labels = CatalogLabels::new(Locale::Ja);
    let catalog = sample_catalog();
    let text = ExportText::default();
    let draft = complete_draft();

    let mut bare = MatchedResearcher::new(MatchingId(1), None);
    let mut explained = MatchedResearcher::new(MatchingId(2), Some(ResearcherId(20)));
    explained.explanation = Some("top-level".into());
    bare.nested_explanation = Some("  ".into());
    let session = session_for(&draft, vec![bare, explained]);

    let workbook =
        ExportTransform::new(&labels, &catalog, &text).build(&draft, &session, &FavoriteSet::new());
    let sheet = &workbook.sheets[1];

    assert_eq!(sheet.cell(1, 0), Some("―"));
    assert_eq!(sheet.cell(1, 5), Some("―"));
    assert_eq!(sheet.cell(2, 5), Some("top-level"));
    assert_eq!(
        sheet.cell(1, 4),
        Some("https://nrid.nii.ac.jp/ja/nrid/1000000000001")
    );
}

#[test]
fn english_export_prefers_localized_fields() {
    let labels = CatalogLabels::new(Locale::En);
    let catalog = sample_catalog();
    let text = ExportText::default();
    let draft = complete_draft();
    let session = session_for(&draft, sample_researchers(1));

    let mut localized = LocalizedDirectory::new();
    localized.insert(
        ResearcherId(1001),
        LocalizedFields {
            name: Some("Researcher One".into()),
            affiliation: Some("The University of Tokyo".into()),
            ..LocalizedFields::default()
        },
    );

    let workbook = ExportTransform::new(&labels, &catalog, &text)
        .with_locale(Locale::En)
        .with_localized(&localized)
        .build(&draft, &session, &FavoriteSet::new());
    let sheet = &workbook.sheets[1];

    assert_eq!(sheet.cell(1, 0), Some("Researcher One"));
    assert_eq!(sheet.cell(1, 1), Some("The University of Tokyo"));
    assert_eq!(sheet.cell(1, 2), Some("工学系研究科"));
}

#[test]
fn japanese_text_matches_sheet_conventions() {
    let labels = CatalogLabels::new(Locale::Ja);
    let catalog = sample_catalog();
    let text = ExportText::japanese();
    let draft = complete_draft().with_universities(UniversitySelection::All);
    let session = session_for(&draft, sample_researchers(1));

    let workbook =
        ExportTransform::new(&labels, &catalog, &text).build(&draft, &session, &FavoriteSet::new());

    assert_eq!(workbook.sheets[0].name, "案件情報");
    assert_eq!(workbook.sheets[0].cell(4, 1), Some("全大学（7校）"));
    assert_eq!(workbook.sheets[1].cell(0, 6), Some("お気に入り登録"));
    assert_eq!(workbook.sheets[1].cell(1, 6), Some("未登録"));
}

#[test]
fn export_uses_session_project_id_for_filename() {
    let labels = CatalogLabels::new(Locale::Ja);
    let catalog = sample_catalog();
    let text = ExportText::default();
    let draft = ProjectDraft::new().with_title("Robotics: grasping <phase 2>");
    let session = session_for(&draft, Vec::new());

    let file = ExportTransform::new(&labels, &catalog, &text).export(
        &draft,
        &session,
        &FavoriteSet::new(),
    );
    assert_eq!(file.filename, "12_Robotics grasping phase 2.xlsx");
}

proptest! {
    #[test]
    fn prop_transform_is_deterministic(
        favorite_mask in proptest::collection::vec(any::<bool>(), 0..6),
        title in "[a-zA-Z0-9 /:*?]{0,50}",
    ) {
        let labels = CatalogLabels::new(Locale::Ja);
        let catalog = sample_catalog();
        let text = ExportText::default();
        let draft = complete_draft().with_title(&title);
        let count = i64::try_from(favorite_mask.len()).unwrap();
        let session = session_for(&draft, sample_researchers(count));
        let favorites: FavoriteSet = favorite_mask
            .iter()
            .enumerate()
            .map(|(i, f)| (MatchingId(i64::try_from(i).unwrap() + 1), *f))
            .collect();

        let transform = ExportTransform::new(&labels, &catalog, &text);
        let first = transform.export(&draft, &session, &favorites);
        let second = transform.export(&draft, &session, &favorites);

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.workbook.sheets[1].len(), favorite_mask.len() + 1);
    }

    #[test]
    fn prop_filename_never_contains_illegal_chars(title in ".{0,80}") {
        let name = intake_export::export_filename(ProjectId(1), &title);
        let stem = name
            .strip_prefix("1_")
            .and_then(|s| s.strip_suffix(".xlsx"))
            .unwrap();
        prop_assert!(!stem.is_empty());
        prop_assert!(stem.chars().count() <= FILENAME_TITLE_MAX_CHARS);
        prop_assert!(!stem.contains(['\\', '/', ':', '*', '?', '"', '<', '>', '|']));
    }
}
