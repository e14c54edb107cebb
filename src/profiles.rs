//! Built-in harvest profiles, one per scraping target.

use crate::config::{HarvestConfig, PaginationConfig, SearchParams};
use crate::filter::{CandidateFilterConfig, Category, CategoryRule};
use crate::liveness::LivenessConfig;
use crate::query::QueryBuilder;
use crate::throttle::ThrottleConfig;

const APPLY_BY_EMAIL: [&str; 3] = ["send your CV", "apply by email", "email your application"];

const UK_REGION_MARKERS: [&str; 4] = [" uk ", "united kingdom", ".co.uk", "/uk/"];

const STALE_PHRASES: [&str; 4] = ["2 months ago", "3 months ago", "4 months ago", "year ago"];

const FINANCE_QUERY_TERMS: [&str; 37] = [
    "accounting",
    "finance",
    "financial analyst",
    "financial controller",
    "investment analyst",
    "accountant",
    "bookkeeper",
    "auditor",
    "audit assistant",
    "assistant accountant",
    "tax consultant",
    "tax assistant",
    "banking",
    "treasury analyst",
    "finance manager",
    "financial planning",
    "FP&A",
    "finance director",
    "CFO",
    "financial services",
    "credit analyst",
    "financial advisor",
    "compliance",
    "risk analyst",
    "mortgage advisor",
    "insurance",
    "corporate finance",
    "fund accountant",
    "payroll",
    "bookkeeping",
    "reconciliation",
    "controller",
    "treasurer",
    "accounting assistant",
    "audit trainee",
    "finance graduate",
    "financial administrator",
];

const FINANCE_KEYWORDS: [&str; 37] = [
    "finance",
    "financial",
    "accounting",
    "accountant",
    "auditor",
    "audit",
    "analyst",
    "controller",
    "treasury",
    "banking",
    "investment",
    "payroll",
    "cfo",
    "fp&a",
    "tax",
    "risk",
    "compliance",
    "credit",
    "wealth",
    "equity",
    "treasurer",
    "advisor",
    "consultant",
    "bookkeeping",
    "fund",
    "portfolio",
    "mortgage",
    "insurance",
    "corporate finance",
    "reconciliation",
    "finance assistant",
    "assistant accountant",
    "financial administrator",
    "audit trainee",
    "finance graduate",
    "financial services",
    "bookkeeper",
];

const NON_FINANCE_KEYWORDS: [&str; 27] = [
    "marketing",
    "developer",
    "engineer",
    "technician",
    "nurse",
    "teacher",
    "chef",
    "sales",
    "recruiter",
    "designer",
    "social media",
    "pr",
    "construction",
    "warehouse",
    "driver",
    "operator",
    "customer service",
    "hospitality",
    "bartender",
    "barista",
    "retail",
    "cleaner",
    "graphic",
    "web",
    "software",
    "frontend",
    "backend",
];

const INTERNSHIP_TERMS: [&str; 11] = [
    "finance intern",
    "financial analyst intern",
    "accounting intern",
    "investment intern",
    "finance internship",
    "corporate finance intern",
    "banking intern",
    "treasury intern",
    "financial services intern",
    "audit intern",
    "tax intern",
];

const FRONTEND_TERMS: [&str; 6] = [
    "frontend",
    "react",
    "javascript",
    "typescript",
    "software",
    "developer",
];

const MARKETING_TITLE_TERMS: [&str; 18] = [
    "marketing",
    "digital marketing",
    "social media",
    "SEO",
    "advertising",
    "content",
    "communications",
    "PR",
    "public relations",
    "brand",
    "growth",
    "media",
    "creative",
    "copywriter",
    "campaign",
    "performance",
    "influencer",
    "paid media",
];

/// A named preset bundling query, filter and liveness settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    LinkedinDenmark,
    LinkedinUk,
    UkFinance,
    UkFinanceInternships,
    UkFrontend,
    UkMarketing,
}

impl Profile {
    pub const ALL: [Profile; 6] = [
        Profile::LinkedinDenmark,
        Profile::LinkedinUk,
        Profile::UkFinance,
        Profile::UkFinanceInternships,
        Profile::UkFrontend,
        Profile::UkMarketing,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Profile::LinkedinDenmark => "linkedin_denmark",
            Profile::LinkedinUk => "linkedin_uk",
            Profile::UkFinance => "uk_finance",
            Profile::UkFinanceInternships => "uk_finance_internships",
            Profile::UkFrontend => "uk_frontend",
            Profile::UkMarketing => "uk_marketing",
        }
    }

    /// Look a profile up by its snake_case name
    pub fn from_name(name: &str) -> Option<Profile> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// The full run configuration for this profile
    pub fn config(&self) -> HarvestConfig {
        match self {
            Profile::LinkedinDenmark => linkedin_denmark(),
            Profile::LinkedinUk => linkedin_uk(),
            Profile::UkFinance => uk_finance(),
            Profile::UkFinanceInternships => uk_finance_internships(),
            Profile::UkFrontend => uk_frontend(),
            Profile::UkMarketing => uk_marketing(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Classification rules shared by every profile, most specific first
pub fn default_categories() -> Vec<CategoryRule> {
    vec![
        CategoryRule {
            category: Category::FinanceInternship,
            include: strings(&INTERNSHIP_TERMS),
            exclude: Vec::new(),
        },
        CategoryRule {
            category: Category::Frontend,
            include: strings(&["frontend", "front-end", "react", "javascript", "typescript"]),
            exclude: Vec::new(),
        },
        CategoryRule {
            category: Category::Marketing,
            include: strings(&[
                "marketing",
                "social media",
                "seo",
                "advertising",
                "copywriter",
                "public relations",
                "influencer",
                "paid media",
            ]),
            exclude: Vec::new(),
        },
        CategoryRule {
            category: Category::Finance,
            include: strings(&FINANCE_KEYWORDS),
            exclude: strings(&["developer", "engineer", "software"]),
        },
    ]
}

/// Base for the UK SerpAPI profiles that page 10 results at a time
fn uk_search(q: String, tbs: &str) -> SearchParams {
    SearchParams {
        q,
        hl: Some("en".to_string()),
        gl: Some("uk".to_string()),
        location: Some("United Kingdom".to_string()),
        filter: Some("0".to_string()),
        tbs: Some(tbs.to_string()),
        ..SearchParams::default()
    }
}

fn base(name: &str, output_prefix: &str, search: SearchParams) -> HarvestConfig {
    let mut config = HarvestConfig::new(name, search.q.clone());
    config.output_prefix = output_prefix.to_string();
    config.search = search;
    config.categories = default_categories();
    config
}

fn linkedin_denmark() -> HarvestConfig {
    let q = QueryBuilder::new()
        .sites(["linkedin.com/jobs/denmark", "linkedin.com/jobs/view/"])
        .any_phrase([
            "send ansøgning",
            "send din ansøgning",
            "send dit CV",
            "ansøg via mail",
            "ansøg på mail",
            "send os din ansøgning",
            "@gmail.com",
            "@company.com",
        ])
        .build();

    let mut config = base(
        "linkedin_denmark",
        "linkedin_denmark_jobs",
        SearchParams {
            q,
            hl: Some("da".to_string()),
            gl: Some("dk".to_string()),
            num: 50,
            tbs: Some("qdr:m".to_string()),
            ..SearchParams::default()
        },
    );
    config.pagination = PaginationConfig {
        page_size: 50,
        max_results: 50,
    };
    config.filter = CandidateFilterConfig {
        required_link_fragment: Some("linkedin.com/jobs".to_string()),
        ..CandidateFilterConfig::default()
    };
    config
}

fn linkedin_uk() -> HarvestConfig {
    let q = QueryBuilder::new()
        .site("linkedin.com/jobs")
        .any_phrase([
            "send your CV to",
            "email your CV to",
            "apply by email",
            "send your application to",
            "email your application to",
        ])
        .phrase("@")
        .any_phrase(["United Kingdom", "UK", ".co.uk"])
        .build();

    let mut config = base(
        "linkedin_uk",
        "linkedin_uk_jobs",
        SearchParams {
            q,
            hl: Some("en".to_string()),
            gl: Some("gb".to_string()),
            num: 100,
            tbs: Some("qdr:m".to_string()),
            ..SearchParams::default()
        },
    );
    config.pagination = PaginationConfig {
        page_size: 100,
        max_results: 100,
    };
    config.filter = CandidateFilterConfig {
        required_link_fragment: Some("linkedin.com/jobs".to_string()),
        required_tokens: strings(&["@"]),
        stale_phrases: strings(&STALE_PHRASES),
        ..CandidateFilterConfig::default()
    };
    config
}

fn uk_finance() -> HarvestConfig {
    let q = QueryBuilder::new()
        .site("linkedin.com/jobs")
        .raw("inurl:uk")
        .any_phrase([
            "send your CV",
            "apply by email",
            "email your application",
            "send your application to",
        ])
        .any_phrase(["@co.uk", "@gmail.com", "@outlook.com"])
        .any_word(FINANCE_QUERY_TERMS)
        .build();

    let mut config = base(
        "uk_finance",
        "linkedin_uk_finance_jobs",
        uk_search(q, "qdr:w"),
    );
    config.pagination = PaginationConfig {
        page_size: 10,
        max_results: 30,
    };
    config.throttle = ThrottleConfig {
        page_delay_ms: 2000,
        ..ThrottleConfig::default()
    };
    config.filter = CandidateFilterConfig {
        required_tokens: strings(&["@"]),
        region_markers: strings(&UK_REGION_MARKERS),
        include_keywords: strings(&FINANCE_KEYWORDS),
        exclude_keywords: strings(&NON_FINANCE_KEYWORDS),
        ..CandidateFilterConfig::default()
    };
    config.liveness = Some(LivenessConfig {
        timeout_secs: 8,
        ..LivenessConfig::default()
    });
    config.max_output = Some(30);
    config
}

fn uk_finance_internships() -> HarvestConfig {
    let q = QueryBuilder::new()
        .site("linkedin.com/jobs")
        .any_phrase(INTERNSHIP_TERMS)
        .any_phrase(APPLY_BY_EMAIL)
        .raw("intext:@")
        .phrase("United Kingdom")
        .build();

    let mut config = base(
        "uk_finance_internships",
        "linkedin_uk_finance_internships",
        uk_search(q, "qdr:m"),
    );
    config.filter = CandidateFilterConfig {
        title_keywords: strings(&["intern", "interns", "internship", "internships"]),
        ..CandidateFilterConfig::default()
    };
    config.liveness = Some(LivenessConfig {
        collect_emails: true,
        require_email: true,
        ..LivenessConfig::default()
    });
    config
}

fn uk_frontend() -> HarvestConfig {
    let q = QueryBuilder::new()
        .site("linkedin.com/jobs")
        .any_phrase(["frontend developer", "react developer", "software engineer"])
        .any_phrase(APPLY_BY_EMAIL)
        .phrase("@")
        .phrase("United Kingdom")
        .build();

    let mut config = base(
        "uk_frontend",
        "linkedin_uk_frontend_emails_full",
        uk_search(q, "qdr:m"),
    );
    config.filter = CandidateFilterConfig {
        include_keywords: strings(&FRONTEND_TERMS),
        ..CandidateFilterConfig::default()
    };
    config.liveness = Some(LivenessConfig {
        collect_emails: true,
        require_email: true,
        ..LivenessConfig::default()
    });
    config
}

fn uk_marketing() -> HarvestConfig {
    let q = QueryBuilder::new()
        .site("linkedin.com/jobs")
        .intitle_any(MARKETING_TITLE_TERMS)
        .any_phrase(APPLY_BY_EMAIL)
        .any_phrase([
            "@gmail.com",
            "@outlook.com",
            "@hotmail.com",
            "@company.co.uk",
            "@co.uk",
            "@",
        ])
        .any_phrase(["United Kingdom", "UK"])
        .build();

    let mut config = base(
        "uk_marketing",
        "linkedin_uk_marketing_jobs",
        SearchParams {
            q,
            filter: Some("0".to_string()),
            tbs: Some("qdr:w".to_string()),
            ..SearchParams::default()
        },
    );
    config.filter = CandidateFilterConfig {
        required_tokens: strings(&["@"]),
        ..CandidateFilterConfig::default()
    };
    config
}
