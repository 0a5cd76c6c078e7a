//! Fixed workbook text

use serde::{Deserialize, Serialize};

/// Literal strings written into the workbook
///
/// `{n}` in `all_universities` and `{k}` in `university_count` are
/// replaced with the respective counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportText {
    /// First sheet name
    pub project_sheet: String,
    /// Second sheet name
    pub researcher_sheet: String,
    /// Row labels of the project sheet, in row order
    pub project_labels: [String; 6],
    /// Header row of the researcher sheet
    pub researcher_headers: [String; 7],
    /// Absent optional value
    pub unspecified: String,
    /// Canonical "every level" summary
    pub all_levels: String,
    /// Full-coverage university summary
    pub all_universities: String,
    /// Suffix after an explicit university list
    pub university_count: String,
    /// Favorite flag set
    pub favorite_registered: String,
    /// Favorite flag unset
    pub favorite_unregistered: String,
    /// Absent researcher field or reason
    pub placeholder: String,
}

fn owned<const N: usize>(items: [&str; N]) -> [String; N] {
    items.map(str::to_string)
}

impl Default for ExportText {
    fn default() -> Self {
        Self {
            project_sheet: "project info".into(),
            researcher_sheet: "researcher list".into(),
            project_labels: owned([
                "title",
                "background",
                "industry",
                "business description",
                "universities",
                "researcher levels",
            ]),
            researcher_headers: owned([
                "name",
                "affiliation",
                "department",
                "position",
                "profile",
                "matching reason",
                "favorite",
            ]),
            unspecified: "unspecified".into(),
            all_levels: "all levels".into(),
            all_universities: "All universities ({n})".into(),
            university_count: "({k} 件)".into(),
            favorite_registered: "registered".into(),
            favorite_unregistered: "not registered".into(),
            placeholder: intake_core::FIELD_PLACEHOLDER.into(),
        }
    }
}

impl ExportText {
    /// Japanese sheet text
    #[must_use]
    pub fn japanese() -> Self {
        Self {
            project_sheet: "案件情報".into(),
            researcher_sheet: "研究者一覧".into(),
            project_labels: owned(["案件タイトル", "案件内容", "業種", "事業内容", "大学", "研究者階層"]),
            researcher_headers: owned([
                "氏名",
                "所属",
                "部署",
                "職位",
                "研究者情報",
                "マッチング理由",
                "お気に入り登録",
            ]),
            unspecified: "入力なし".into(),
            all_levels: "全階層 教授／准教授／助教／講師／助教授／助手／研究員／特任教授／特任助教／主任研究員"
                .into(),
            all_universities: "全大学（{n}校）".into(),
            university_count: "（{k}校）".into(),
            favorite_registered: "登録済み".into(),
            favorite_unregistered: "未登録".into(),
            placeholder: intake_core::FIELD_PLACEHOLDER.into(),
        }
    }

    pub(crate) fn all_universities(&self, n: usize) -> String {
        self.all_universities.replace("{n}", &n.to_string())
    }

    pub(crate) fn university_count(&self, k: usize) -> String {
        self.university_count.replace("{k}", &k.to_string())
    }
}
