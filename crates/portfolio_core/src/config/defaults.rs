//! Built-in portfolio content.

use super::PortfolioConfig;
use crate::model::content::{ContentBlock, ListItem};
use crate::model::section::{ContactLink, Section, SectionId};
use crate::tracker::TrackerOptions;
use std::collections::BTreeMap;

const SECTIONS: &[(&str, &str)] = &[
    ("home", "Home"),
    ("about", "About"),
    ("education", "Education"),
    ("experience", "Experience"),
    ("projects", "Projects"),
    ("affiliations", "Affiliations"),
];

const CERTIFICATIONS: &[&str] = &[
    "CompTIA Security+",
    "AWS Certified Cloud Practitioner",
    "ISC2 Certified in Cybersecurity",
    "Google Cybersecurity Certificate",
    "CYB102 Cybersecurity Intermediate (Codepath)",
];

impl PortfolioConfig {
    /// Returns the built-in six-section portfolio.
    pub fn default_portfolio() -> Self {
        let sections: Vec<Section> = SECTIONS
            .iter()
            .map(|(id, title)| Section::new(builtin_id(id), *title))
            .collect();

        let mut content = BTreeMap::new();
        content.insert(builtin_id("home"), home());
        content.insert(builtin_id("about"), about());
        content.insert(builtin_id("education"), education());
        content.insert(builtin_id("experience"), experience());
        content.insert(builtin_id("projects"), projects());
        content.insert(builtin_id("affiliations"), affiliations());

        Self {
            title: "Vincent La".to_string(),
            brand: "=＾● ⋏ ●＾=".to_string(),
            sections,
            contacts: vec![
                ContactLink::new("Email", "mailto:vincentlc0805@gmail.com"),
                ContactLink::new(
                    "LinkedIn",
                    "https://www.linkedin.com/in/vincent-la-a10003280/",
                ),
                ContactLink::new("GitHub", "https://github.com/binniela"),
            ],
            content,
            tracking: TrackerOptions::default(),
        }
    }
}

fn builtin_id(value: &str) -> SectionId {
    SectionId::parse(value).expect("valid built-in section id")
}

fn home() -> Vec<ContentBlock> {
    vec![ContentBlock::Hero {
        lines: vec!["Vincent".to_string(), "La".to_string()],
    }]
}

fn about() -> Vec<ContentBlock> {
    vec![
        ContentBlock::heading("About Me"),
        ContentBlock::paragraph(
            "Hi! I'm driven by a commitment to continuous improvement in everything I do, \
             especially in the fields of IT, cybersecurity, and cloud technologies. Whether I'm \
             honing my technical skills, learning new tools, or collaborating with others, I'm \
             always pushing myself to evolve and deliver the best results.",
        ),
        ContentBlock::subheading("My Core Values"),
        ContentBlock::BulletList {
            items: vec![
                ListItem::led(
                    "Integrity:",
                    "Honesty and transparency are at the heart of my work. I believe in doing \
                     what's right, even when no one is watching, ensuring ethical practices in \
                     every project.",
                ),
                ListItem::led(
                    "Excellence:",
                    "I aim for the highest standards, not just in the outcome of my work but in \
                     how I approach challenges. Every day is an opportunity to learn, improve, \
                     and deliver outstanding results.",
                ),
                ListItem::led(
                    "Continuous Improvement:",
                    "I'm passionate about learning and self-growth. From new certifications in \
                     cloud computing and cybersecurity to mastering emerging technologies, I'm \
                     always seeking ways to stay ahead in this fast-paced industry.",
                ),
                ListItem::led(
                    "Teamwork:",
                    "Success in IT and cybersecurity often depends on strong collaboration. I'm \
                     a firm believer in the power of teamwork and enjoy working alongside \
                     talented professionals to achieve shared goals.",
                ),
            ],
        },
    ]
}

fn education() -> Vec<ContentBlock> {
    vec![
        ContentBlock::heading("Education"),
        ContentBlock::Entry {
            title: "California State Polytechnic University Pomona".to_string(),
            caption: None,
            blocks: vec![
                ContentBlock::paragraph(
                    "B.S Business Administration - Computer Information Systems",
                ),
                ContentBlock::paragraph("Specialization: Information Security and Forensics"),
                ContentBlock::paragraph("Cumulative GPA: 4.0/4.0"),
            ],
        },
        ContentBlock::subheading("Relevant Coursework"),
        ContentBlock::bullets([
            "Cloud Infrastructure - AWS (CIS2670)",
            "Object Oriented Programming (CIS2900)",
            "CodePath Intermediate Cybersecurity",
            "Intro to Networking (Nvidia)",
            "Intro to Personal Computing (CIS1010 - Microsoft Suites)",
        ]),
        ContentBlock::subheading("Certifications"),
        ContentBlock::bullets(CERTIFICATIONS.iter().copied()),
    ]
}

fn experience() -> Vec<ContentBlock> {
    vec![
        ContentBlock::heading("Experience"),
        ContentBlock::Entry {
            title: "Auxilium - Intern".to_string(),
            caption: Some("Los Angeles | May 2024 – May 2024".to_string()),
            blocks: vec![ContentBlock::bullets([
                "Formatted a dataset for machine learning algorithms, ensuring data integrity \
                 and compatibility.",
                "Utilized Excel to organize and manipulate large amounts of insurance \
                 information.",
                "Participated in team meetings to discuss progress and improvements in deadline \
                 management.",
                "Demonstrated frontend website for Auxilium using Next.js.",
            ])],
        },
        ContentBlock::Entry {
            title: "Bambu - Shift Leader".to_string(),
            caption: Some("Millbrae, 203 El Camino Real | August 2021 – May 2023".to_string()),
            blocks: vec![ContentBlock::bullets([
                "Supervised a team to ensure smooth daily operations and high customer \
                 satisfaction.",
                "Streamlined shift transitions, resulting in faster turnover and improved \
                 workflow.",
                "Mentored and trained new employees, enhancing overall team performance.",
            ])],
        },
    ]
}

fn projects() -> Vec<ContentBlock> {
    vec![
        ContentBlock::heading("Projects"),
        ContentBlock::Entry {
            title: "Avanade Hackers".to_string(),
            caption: None,
            blocks: vec![ContentBlock::paragraph(
                "Developed a machine learning tool with 99% accuracy to diagnose chronic \
                 disorders. Integrated Google Gemini for personalized treatment \
                 recommendations, complying with HIPAA.",
            )],
        },
        ContentBlock::Entry {
            title: "DDOS Mitigation Script".to_string(),
            caption: None,
            blocks: vec![ContentBlock::paragraph(
                "Configured NGINX server with DoS mitigation rules. Verified effectiveness \
                 through NGINX Amplify, showing reduced server stress.",
            )],
        },
        ContentBlock::Entry {
            title: "Intrusion Detection Evaluation Dataset (CIC-IDS2017)".to_string(),
            caption: None,
            blocks: vec![ContentBlock::paragraph(
                "Utilized Splunk, Wireshark, and Catalyst to analyze datasets and identify \
                 cyber-attacks. Presented mitigation strategies in a capstone project.",
            )],
        },
    ]
}

fn affiliations() -> Vec<ContentBlock> {
    vec![
        ContentBlock::heading("Affiliations"),
        ContentBlock::Entry {
            title: "Cal Poly Fast | Blue Team Member".to_string(),
            caption: Some("Cal Poly Pomona, 2023".to_string()),
            blocks: Vec::new(),
        },
        ContentBlock::Entry {
            title: "GDSC (Google Developer Student Club) | Project Member".to_string(),
            caption: Some("Cal Poly Pomona, 2024".to_string()),
            blocks: Vec::new(),
        },
    ]
}
