use std::collections::BTreeSet;
use std::str::FromStr;

use crate::models::{RankedStudent, RosterStats, Student};
use crate::view::Memo;

const FIRST_NAMES: [&str; 40] = [
    "Aarav", "Vivaan", "Aditya", "Vihaan", "Arjun", "Reyansh", "Mohammad", "Sai", "Krishna",
    "Ishaan", "Rohan", "Atharv", "Kartik", "Ritvik", "Siddharth", "Yuvraj", "Hrithik", "Dev",
    "Kabir", "Aryan", "Ananya", "Aarohi", "Diya", "Ira", "Aditi", "Anika", "Navya", "Kavya",
    "Myra", "Saanvi", "Ishita", "Riya", "Nitya", "Meera", "Nandini", "Aisha", "Prachi", "Aarya",
    "Tara", "Trisha",
];

const LAST_NAMES: [&str; 30] = [
    "Sharma", "Verma", "Gupta", "Agarwal", "Mehta", "Patel", "Iyer", "Nair", "Menon", "Reddy",
    "Rao", "Kapoor", "Bhatia", "Malhotra", "Chopra", "Khanna", "Kaur", "Singh", "Bose",
    "Chatterjee", "Mukherjee", "Banerjee", "Das", "Ghosh", "Pillai", "Kulkarni", "Deshmukh",
    "Pandey", "Yadav", "Tripathi",
];

const SKILL_POOL: [&str; 50] = [
    "React", "Next.js", "Angular", "Vue", "Node.js", "Express", "NestJS", "TypeScript",
    "JavaScript", "HTML", "CSS", "Tailwind", "Redux", "GraphQL", "REST", "Python", "Django",
    "Flask", "FastAPI", "Pandas", "NumPy", "ML", "DL", "NLP", "LLMs", "Data Eng", "Spark",
    "Hadoop", "Airflow", "SQL", "PostgreSQL", "MySQL", "MongoDB", "Redis", "Kafka", "Docker",
    "K8s", "AWS", "GCP", "Azure", "CI/CD", "Git", "Jest", "Cypress", "Playwright", "Go", "Rust",
    "C++", "Java", "Spring",
];

// Pastel avatar backgrounds.
const AVATAR_COLORS: [&str; 10] = [
    "#CDE6F5", "#DFF6E8", "#E9E2F8", "#FDE2E4", "#FFF4CC", "#E3F2FD", "#FFDDE2", "#D3F8E2",
    "#E7E5FF", "#F3E8FF",
];

pub const INSTITUTE: &str = "MSIT";
pub const ALL_SKILLS: &str = "All";

pub fn name_space() -> usize {
    FIRST_NAMES.len() * LAST_NAMES.len()
}

/// Builds a deterministic roster of `min(count, name_space())` students.
pub fn generate_students(count: usize) -> Vec<Student> {
    (0..count.min(name_space())).map(student_at).collect()
}

fn student_at(i: usize) -> Student {
    let first = FIRST_NAMES[i % FIRST_NAMES.len()];
    let last = LAST_NAMES[(i / FIRST_NAMES.len()) % LAST_NAMES.len()];
    let name = format!("{first} {last}");
    let position = i + 1;

    // Tenths are kept integral so the value is exact to one decimal.
    let cgpa = (f64::from((72 + i % 28) as u32) / 10.0).min(10.0);

    let mut skills: Vec<String> = Vec::with_capacity(3);
    for pick in [i, i * 7, i * 13] {
        let skill = SKILL_POOL[pick % SKILL_POOL.len()];
        if !skills.iter().any(|s| s == skill) {
            skills.push(skill.to_string());
        }
    }

    Student {
        id: format!("{}-{position}", name.to_lowercase().replace(' ', "-")),
        roll: format!("MSIT-CSE2028-{position:03}"),
        name,
        institute: INSTITUTE.to_string(),
        location: "Kolkata, IN".to_string(),
        cgpa,
        score: 70 + ((i * 3) % 31) as u32,
        projects: 3 + (i % 13) as u32,
        streak: ((i * 4) % 35) as u32,
        skills,
        avatar_bg: AVATAR_COLORS[i % AVATAR_COLORS.len()],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Score,
    Cgpa,
    Projects,
    Streak,
}

impl SortField {
    pub fn value(self, student: &Student) -> f64 {
        match self {
            SortField::Score => f64::from(student.score),
            SortField::Cgpa => student.cgpa,
            SortField::Projects => f64::from(student.projects),
            SortField::Streak => f64::from(student.streak),
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "score" => Ok(SortField::Score),
            "cgpa" => Ok(SortField::Cgpa),
            "projects" => Ok(SortField::Projects),
            "streak" => Ok(SortField::Streak),
            other => Err(format!("unknown sort field: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SkillFacet {
    #[default]
    All,
    Only(String),
}

impl SkillFacet {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(ALL_SKILLS) {
            SkillFacet::All
        } else {
            SkillFacet::Only(value.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RosterQuery {
    pub text: String,
    pub skill: SkillFacet,
    pub sort: SortField,
    pub ascending: bool,
}

pub fn filter_by_text(students: Vec<Student>, query: &str) -> Vec<Student> {
    if query.trim().is_empty() {
        return students;
    }
    let q = query.to_lowercase();
    students
        .into_iter()
        .filter(|s| {
            s.name.to_lowercase().contains(&q)
                || s.roll.to_lowercase().contains(&q)
                || s.institute.to_lowercase().contains(&q)
        })
        .collect()
}

pub fn filter_by_skill(students: Vec<Student>, facet: &SkillFacet) -> Vec<Student> {
    match facet {
        SkillFacet::All => students,
        SkillFacet::Only(skill) => students
            .into_iter()
            .filter(|s| s.skills.iter().any(|k| k == skill))
            .collect(),
    }
}

// Stable, so ties keep roster order.
pub fn sort_by(mut students: Vec<Student>, field: SortField, ascending: bool) -> Vec<Student> {
    students.sort_by(|a, b| {
        let ord = field.value(b).total_cmp(&field.value(a));
        if ascending {
            ord.reverse()
        } else {
            ord
        }
    });
    students
}

pub fn assign_rank(students: Vec<Student>) -> Vec<RankedStudent> {
    students
        .into_iter()
        .enumerate()
        .map(|(idx, student)| RankedStudent {
            rank: idx + 1,
            student,
        })
        .collect()
}

pub fn build_view(students: &[Student], query: &RosterQuery) -> Vec<RankedStudent> {
    let list = filter_by_text(students.to_vec(), &query.text);
    let list = filter_by_skill(list, &query.skill);
    let list = sort_by(list, query.sort, query.ascending);
    assign_rank(list)
}

pub fn summarize(students: &[Student]) -> RosterStats {
    let total = students.len();
    if total == 0 {
        return RosterStats {
            total,
            avg_cgpa: 0.0,
            avg_score: 0.0,
            top_streak: 0,
        };
    }

    let cgpa_sum: f64 = students.iter().map(|s| s.cgpa).sum();
    let score_sum: f64 = students.iter().map(|s| f64::from(s.score)).sum();

    RosterStats {
        total,
        avg_cgpa: cgpa_sum / total as f64,
        avg_score: score_sum / total as f64,
        top_streak: students.iter().map(|s| s.streak).max().unwrap_or(0),
    }
}

pub fn skill_options(students: &[Student]) -> Vec<String> {
    let unique: BTreeSet<&str> = students
        .iter()
        .flat_map(|s| s.skills.iter().map(String::as_str))
        .collect();
    std::iter::once(ALL_SKILLS.to_string())
        .chain(unique.into_iter().map(str::to_string))
        .collect()
}

pub fn podium(view: &[RankedStudent]) -> (&[RankedStudent], &[RankedStudent]) {
    view.split_at(view.len().min(3))
}

pub struct Leaderboard {
    students: Vec<Student>,
    stats: RosterStats,
    view: Memo<RosterQuery, Vec<RankedStudent>>,
}

impl Leaderboard {
    pub fn new(students: Vec<Student>) -> Self {
        let stats = summarize(&students);
        Self {
            students,
            stats,
            view: Memo::new(),
        }
    }

    pub fn stats(&self) -> &RosterStats {
        &self.stats
    }

    pub fn view(&mut self, query: &RosterQuery) -> &[RankedStudent] {
        let students = &self.students;
        self.view.get_or_compute(query, |q| build_view(students, q))
    }
}
