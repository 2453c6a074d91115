/// Backend collections reachable through the generic CRUD calls.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Resource {
    Lands,
    Houses,
    Blogs,
    Categories,
    Tags,
    Events,
    Reviews,
    Media,
    Subscribers,
    Campaigns,
}

impl Resource {
    pub const ALL: [Resource; 10] = [
        Self::Lands,
        Self::Houses,
        Self::Blogs,
        Self::Categories,
        Self::Tags,
        Self::Events,
        Self::Reviews,
        Self::Media,
        Self::Subscribers,
        Self::Campaigns,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Lands => "/lands",
            Self::Houses => "/houses",
            Self::Blogs => "/blogs",
            Self::Categories => "/categories",
            Self::Tags => "/tags",
            Self::Events => "/events",
            Self::Reviews => "/reviews",
            Self::Media => "/media",
            Self::Subscribers => "/newsletter/subscribers",
            Self::Campaigns => "/newsletter/campaigns",
        }
    }

    /// Segment used by the admin routes (`/admin/{segment}`).
    pub fn segment(&self) -> &'static str {
        match self {
            Self::Lands => "lands",
            Self::Houses => "houses",
            Self::Blogs => "blogs",
            Self::Categories => "categories",
            Self::Tags => "tags",
            Self::Events => "events",
            Self::Reviews => "reviews",
            Self::Media => "media",
            Self::Subscribers => "subscribers",
            Self::Campaigns => "campaigns",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segment())
    }
}

impl std::str::FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.segment().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown resource: {}", s))
    }
}
