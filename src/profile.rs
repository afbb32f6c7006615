use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::models::{
    Activity, Certification, Course, Experience, MetricValidation, Platform, ProfileMetrics,
    SkillLevel,
};

// Same unreserved set as the browser's component encoding.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub const QR_DOWNLOAD_NAME: &str = "profile-qr.svg";

/// Both checks use closed intervals: `0 <= sgpa <= 10`, `0 <= attendance <= 100`.
/// NaN fails both.
pub fn validate_metrics(metrics: ProfileMetrics) -> MetricValidation {
    MetricValidation {
        sgpa_valid: (0.0..=10.0).contains(&metrics.sgpa),
        attendance_valid: (0.0..=100.0).contains(&metrics.attendance),
    }
}

pub struct Profile {
    pub name: &'static str,
    pub rank: u32,
    pub total_students: u32,
    pub metrics: ProfileMetrics,
    pub skills: Vec<SkillLevel>,
    pub extracurriculars: Vec<Activity>,
    pub experiences: Vec<Experience>,
    pub certifications: Vec<Certification>,
    pub courses: Vec<Course>,
    pub platforms: Vec<Platform>,
}

impl Profile {
    pub fn rank_fill(&self) -> f64 {
        if self.total_students == 0 {
            return 0.0;
        }
        f64::from(self.rank) / f64::from(self.total_students) * 100.0
    }

    pub fn sgpa_fill(&self) -> f64 {
        self.metrics.sgpa / 10.0 * 100.0
    }

    pub fn attendance_fill(&self) -> f64 {
        self.metrics.attendance
    }
}

pub fn demo_profile() -> Profile {
    Profile {
        name: "Arpan Kumar De",
        rank: 12,
        total_students: 220,
        metrics: ProfileMetrics {
            sgpa: 9.2,
            attendance: 96.0,
        },
        skills: vec![
            SkillLevel { name: "Java", level: 86 },
            SkillLevel { name: "Go", level: 78 },
            SkillLevel { name: "TypeScript", level: 80 },
            SkillLevel { name: "React", level: 88 },
            SkillLevel { name: "Next.js", level: 82 },
            SkillLevel { name: "Docker", level: 90 },
        ],
        extracurriculars: vec![
            Activity {
                title: "CodeSprint - Finalist",
                desc: "Top 10 among 500+ participants for an end-to-end system design challenge.",
                date: "2024",
            },
            Activity {
                title: "Open Source - Maintainer",
                desc: "Maintains a small CLI toolkit used by 1k+ monthly downloads.",
                date: "2023",
            },
        ],
        experiences: vec![
            Experience {
                title: "Software Development Intern",
                org: "Codekerdos",
                range: "May 2025 - Present",
                desc: "Remote • React.js, TypeScript (+3)",
            },
            Experience {
                title: "Founder and CEO",
                org: "Growsoc",
                range: "May 2024 - Sep 2025",
                desc: "Remote • Leadership and cross-functional team leadership",
            },
            Experience {
                title: "Advisory Information Technology Specialist",
                org: "TestKart",
                range: "Jun 2024 - Present",
                desc: "Remote • Strategic planning and consulting",
            },
            Experience {
                title: "Project Intern",
                org: "Infosys Springboard",
                range: "May 2024 - Aug 2024",
                desc: "Artificial Intelligence Project Intern • NLP, Agile methodologies",
            },
            Experience {
                title: "Chief Technology Officer",
                org: "MentorMenti",
                range: "Jan 2024 - Jun 2024",
                desc: "Remote • Technology management, event management (+4)",
            },
            Experience {
                title: "Full Stack Developer",
                org: "MentorMenti",
                range: "Dec 2023 - Jan 2024",
                desc: "Full-time • Node.js, React.js (+5)",
            },
            Experience {
                title: "Web Development Intern",
                org: "MentorMenti",
                range: "Nov 2023 - Dec 2023",
                desc: "Internship",
            },
            Experience {
                title: "Software Engineer Intern",
                org: "Acme Systems",
                range: "May 2024 - Aug 2024",
                desc: "Built Go microservices and optimized PostgreSQL queries, reducing P95 latency by 35%.",
            },
            Experience {
                title: "Teaching Assistant",
                org: "MSIT - CS Dept.",
                range: "Jan 2023 - Dec 2023",
                desc: "Led weekly lab sessions on DSA and code reviews for 60+ students.",
            },
        ],
        certifications: vec![
            Certification {
                title: "AWS Certified Solutions Architect - Associate",
                org: "Amazon Web Services",
                date: "2024",
                url: "https://aws.amazon.com/certification/certified-solutions-architect-associate/",
            },
            Certification {
                title: "Microsoft Certified: Azure Developer Associate (AZ-204)",
                org: "Microsoft",
                date: "2024",
                url: "https://learn.microsoft.com/certifications/azure-developer/",
            },
            Certification {
                title: "Google Cloud Associate Cloud Engineer",
                org: "Google Cloud",
                date: "2023",
                url: "https://cloud.google.com/learn/certification/cloud-engineer",
            },
        ],
        courses: vec![
            Course {
                provider: "Coursera",
                title: "Algorithms, Part I - Princeton",
                url: "https://www.coursera.org/learn/algorithms-part1",
                progress: 100,
            },
            Course {
                provider: "Udemy",
                title: "System Design Fundamentals",
                url: "https://www.udemy.com/",
                progress: 75,
            },
            Course {
                provider: "Udemy",
                title: "Kubernetes for Developers",
                url: "https://www.udemy.com/",
                progress: 65,
            },
            Course {
                provider: "Coursera",
                title: "Scalable Microservices with gRPC",
                url: "https://www.coursera.org/",
                progress: 55,
            },
        ],
        platforms: vec![
            Platform {
                label: "GitHub",
                username: "arpankumarde",
                url: "https://github.com/arpankumarde",
            },
            Platform {
                label: "LeetCode",
                username: "arpankumarde",
                url: "https://leetcode.com/arpankumarde",
            },
        ],
    }
}

pub trait UrlProvider {
    fn current_url(&self) -> Option<String>;
}

/// Turns a string into the address of a rendered QR image.
pub trait QrRenderer {
    fn image_url(&self, data: &str) -> String;
}

pub struct FixedUrl(pub String);

impl UrlProvider for FixedUrl {
    fn current_url(&self) -> Option<String> {
        Some(self.0.trim().to_string()).filter(|u| !u.is_empty())
    }
}

/// Renders through a qrserver-style `create-qr-code` endpoint.
pub struct QrServer {
    endpoint: String,
}

impl QrServer {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
        }
    }
}

impl QrRenderer for QrServer {
    fn image_url(&self, data: &str) -> String {
        format!(
            "{}?size=280x280&format=svg&qzone=2&data={}",
            self.endpoint,
            utf8_percent_encode(data, COMPONENT)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareArtifact {
    pub page_url: String,
    pub image_url: String,
    pub download_name: &'static str,
}

/// `None` when no page URL is available.
pub fn share_artifact(urls: &dyn UrlProvider, qr: &dyn QrRenderer) -> Option<ShareArtifact> {
    let page_url = urls.current_url()?;
    Some(ShareArtifact {
        image_url: qr.image_url(&page_url),
        page_url,
        download_name: QR_DOWNLOAD_NAME,
    })
}
