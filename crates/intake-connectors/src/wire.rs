//! JSON bodies exchanged with the matching backend
//!
//! Request bodies borrow from the draft. Reply records are lenient: every
//! descriptive field may be absent or null, and unknown vocabulary values
//! are dropped with a warning rather than failing the whole reply.

use intake_core::{
    Industry, LocalizedDirectory, LocalizedFields, MatchedResearcher, MatchingId,
    ProjectDraft, ResearcherId, ResearcherLevel, UniversitySelection,
};
use serde::{Deserialize, Serialize};

/// Draft fields as the backend names them
#[derive(Debug, Serialize)]
pub(crate) struct ProjectBody<'a> {
    project_title: &'a str,
    project_content: &'a str,
    industry_category: &'a str,
    business_description: &'a str,
    university: Vec<String>,
    preferred_researcher_level: Vec<String>,
}

impl<'a> ProjectBody<'a> {
    pub(crate) fn from_draft(draft: &'a ProjectDraft) -> Self {
        Self {
            project_title: draft.title(),
            project_content: draft.background(),
            industry_category: draft.industry().map_or("", Industry::wire_name),
            business_description: draft.business_description(),
            university: draft.universities().to_wire(),
            preferred_researcher_level: draft.level_wire_names(),
        }
    }
}

/// suggest-content request
#[derive(Debug, Serialize)]
pub(crate) struct SuggestBody<'a> {
    #[serde(flatten)]
    pub(crate) project: ProjectBody<'a>,
    pub(crate) application_deadline: String,
    pub(crate) language: &'static str,
}

/// suggest-content reply: `{"message": ...}` or a bare string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SuggestReply {
    Message { message: Option<String> },
    Text(String),
}

impl SuggestReply {
    pub(crate) fn into_text(self) -> String {
        match self {
            Self::Message { message } => message.unwrap_or_default(),
            Self::Text(text) => text,
        }
    }
}

/// register-project reply
#[derive(Debug, Deserialize)]
pub(crate) struct RegistrationReply {
    pub(crate) project_id: Option<i64>,
    pub(crate) id: Option<i64>,
    pub(crate) project_title: Option<String>,
    pub(crate) matched_researchers: Option<Vec<ResearcherRecord>>,
}

impl RegistrationReply {
    /// `project_id`, falling back to `id`
    pub(crate) fn assigned_id(&self) -> Option<i64> {
        self.project_id.or(self.id)
    }
}

/// fetch-matching-results reply
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct MatchingReply {
    pub(crate) project_title: Option<String>,
    pub(crate) project_content: Option<String>,
    pub(crate) industry_category: Option<String>,
    pub(crate) business_description: Option<String>,
    pub(crate) university: Option<Vec<String>>,
    pub(crate) preferred_researcher_level: Option<Vec<String>>,
    pub(crate) matched_researchers: Option<Vec<ResearcherRecord>>,
}

impl MatchingReply {
    /// Project metadata as a draft
    pub(crate) fn project(&self) -> ProjectDraft {
        let mut draft = ProjectDraft::new()
            .with_title(self.project_title.as_deref().unwrap_or_default())
            .with_background(self.project_content.as_deref().unwrap_or_default())
            .with_business_description(self.business_description.as_deref().unwrap_or_default())
            .with_universities(UniversitySelection::from(
                self.university.clone().unwrap_or_default(),
            ))
            .with_levels(parse_levels(
                self.preferred_researcher_level.as_deref().unwrap_or_default(),
            ));
        draft.set_industry(parse_industry(self.industry_category.as_deref()));
        draft
    }
}

/// One matching entry
#[derive(Debug, Deserialize)]
pub(crate) struct ResearcherRecord {
    matching_id: i64,
    matching_reason: Option<String>,
    explanation: Option<String>,
    favorite_status: Option<bool>,
    researcher_info: Option<ResearcherInfo>,
}

/// Researcher profile nested in a matching entry
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResearcherInfo {
    researcher_id: Option<i64>,
    researcher_name: Option<String>,
    researcher_affiliation_current: Option<String>,
    researcher_department_current: Option<String>,
    researcher_position_current: Option<String>,
    research_field_pi: Option<String>,
    explanation: Option<String>,
}

impl From<ResearcherRecord> for MatchedResearcher {
    fn from(record: ResearcherRecord) -> Self {
        let info = record.researcher_info.unwrap_or_default();
        // zero is treated as absent
        let researcher_id = info.researcher_id.filter(|id| *id != 0).map(ResearcherId);

        let mut researcher = MatchedResearcher::new(MatchingId(record.matching_id), researcher_id)
            .with_favorite(record.favorite_status.unwrap_or(false));
        researcher.name = info.researcher_name;
        researcher.affiliation = info.researcher_affiliation_current;
        researcher.department = info.researcher_department_current;
        researcher.position = info.researcher_position_current;
        researcher.research_field = info.research_field_pi;
        researcher.matching_reason = record.matching_reason;
        researcher.nested_explanation = info.explanation;
        researcher.explanation = record.explanation;
        researcher
    }
}

/// Convert records in arrival order
pub(crate) fn researchers(records: Option<Vec<ResearcherRecord>>) -> Vec<MatchedResearcher> {
    records
        .unwrap_or_default()
        .into_iter()
        .map(MatchedResearcher::from)
        .collect()
}

/// fetch-localized-researcher-fields request
#[derive(Debug, Serialize)]
pub(crate) struct LocalizedBody {
    pub(crate) researcher_ids: Vec<i64>,
}

/// fetch-localized-researcher-fields reply: wrapped or bare list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum LocalizedReply {
    Wrapped { researchers: Vec<LocalizedRecord> },
    Bare(Vec<LocalizedRecord>),
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocalizedRecord {
    researcher_id: i64,
    researcher_name: Option<String>,
    researcher_affiliation_current: Option<String>,
    researcher_department_current: Option<String>,
    researcher_position_current: Option<String>,
    research_field_pi: Option<String>,
}

impl LocalizedReply {
    pub(crate) fn into_directory(self) -> LocalizedDirectory {
        let records = match self {
            Self::Wrapped { researchers } | Self::Bare(researchers) => researchers,
        };
        records
            .into_iter()
            .map(|r| {
                (
                    ResearcherId(r.researcher_id),
                    LocalizedFields {
                        name: r.researcher_name,
                        affiliation: r.researcher_affiliation_current,
                        department: r.researcher_department_current,
                        position: r.researcher_position_current,
                        research_field: r.research_field_pi,
                    },
                )
            })
            .collect()
    }
}

/// set-favorite request
#[derive(Debug, Serialize)]
pub(crate) struct FavoriteBody {
    pub(crate) matching_id: i64,
    pub(crate) favorite_status: bool,
}

/// send-offer request
#[derive(Debug, Serialize)]
pub(crate) struct OfferBody {
    pub(crate) project_id: i64,
    pub(crate) researcher_ids: Vec<i64>,
}

fn parse_industry(raw: Option<&str>) -> Option<Industry> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match raw.parse() {
        Ok(industry) => Some(industry),
        Err(err) => {
            tracing::warn!(%err, "dropping unknown industry from reply");
            None
        }
    }
}

fn parse_levels(raw: &[String]) -> Vec<ResearcherLevel> {
    raw.iter()
        .filter_map(|name| match name.parse() {
            Ok(level) => Some(level),
            Err(err) => {
                tracing::warn!(%err, "dropping unknown researcher level from reply");
                None
            }
        })
        .collect()
}
