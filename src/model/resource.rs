/// The fixed set of resources exposed over HTTP.
///
/// Each resource is backed by one collection. Documents are schemaless; the
/// only shape rule enforced is the list of required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `{ name, address, courses: [...], ... }`; the only resource with nested array routes
    Institutes,
    /// `{ title, url, durationSeconds, ... }`
    AudioClips,
    /// `{ formName, fields: {...}, submittedAt, ... }`
    FormSubmissions,
    /// `{ name, channel, startDate, endDate, ... }`
    MarketingCampaigns,
    /// `{ campaignId, metric, value, recordedAt, ... }`
    MarketingData,
    /// `{ name, category, students: [...] }`
    Groups,
    /// `{ name, studentIds: [...] }`
    StudentGroups,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Institutes,
        ResourceKind::AudioClips,
        ResourceKind::FormSubmissions,
        ResourceKind::MarketingCampaigns,
        ResourceKind::MarketingData,
        ResourceKind::Groups,
        ResourceKind::StudentGroups,
    ];

    /// URL path segment, also the registry key
    pub fn path(self) -> &'static str {
        match self {
            ResourceKind::Institutes => "institutes",
            ResourceKind::AudioClips => "audioclips",
            ResourceKind::FormSubmissions => "formSubmissions",
            ResourceKind::MarketingCampaigns => "marketingCampaigns",
            ResourceKind::MarketingData => "marketingData",
            ResourceKind::Groups => "groups",
            ResourceKind::StudentGroups => "studentGroups",
        }
    }

    /// Name of the backing collection in the document store
    pub fn collection_name(self) -> &'static str {
        match self {
            ResourceKind::Institutes => "Institutes",
            ResourceKind::AudioClips => "AudioClips",
            ResourceKind::FormSubmissions => "FormSubmissions",
            ResourceKind::MarketingCampaigns => "MarketingCampaigns",
            ResourceKind::MarketingData => "MarketingData",
            ResourceKind::Groups => "Groups",
            ResourceKind::StudentGroups => "StudentGroups",
        }
    }

    /// Human-readable singular label used in response messages
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Institutes => "Institute",
            ResourceKind::AudioClips => "Audio clip",
            ResourceKind::FormSubmissions => "Form submission",
            ResourceKind::MarketingCampaigns => "Marketing campaign",
            ResourceKind::MarketingData => "Marketing data",
            ResourceKind::Groups => "Group",
            ResourceKind::StudentGroups => "Student group",
        }
    }

    pub fn plural_label(self) -> &'static str {
        match self {
            ResourceKind::Institutes => "Institutes",
            ResourceKind::AudioClips => "Audio clips",
            ResourceKind::FormSubmissions => "Form submissions",
            ResourceKind::MarketingCampaigns => "Marketing campaigns",
            ResourceKind::MarketingData => "Marketing data",
            ResourceKind::Groups => "Groups",
            ResourceKind::StudentGroups => "Student groups",
        }
    }

    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Groups => &["name", "category"],
            ResourceKind::StudentGroups => &["name"],
            _ => &[],
        }
    }

    pub fn supports_nested_arrays(self) -> bool {
        matches!(self, ResourceKind::Institutes)
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.path() == path)
    }
}
