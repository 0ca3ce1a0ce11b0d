//! The report content: chart data plus the deck narrative.
//!
//! [`ReportContent::builtin`] reproduces the validation-session report the
//! generator was written for.  The same structure can be dumped to JSON,
//! edited and loaded back to produce a different deck without recompiling.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::deck::{Block, DeckTemplate, DeckTheme, Slide};
use crate::error::{DeckError, Result};
use crate::model::{CategoryBox, ChartKind, Milestone, Rgb, TimeSeriesPoint, TrendSeries};

/// Everything the generator draws and writes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportContent {
    pub boxes: Vec<CategoryBox>,
    pub revenue: TrendSeries,
    pub milestones: Vec<Milestone>,
    pub deck: DeckTemplate,
}

impl ReportContent {
    /// Loads content from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| DeckError::ConfigRead {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| DeckError::ConfigParse {
            path: path.to_owned(),
            source,
        })
    }

    /// Serialises the content as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// The built-in validation-session report.
    pub fn builtin() -> Self {
        Self {
            boxes: builtin_boxes(),
            revenue: builtin_revenue(),
            milestones: builtin_milestones(),
            deck: builtin_deck(),
        }
    }
}

fn builtin_boxes() -> Vec<CategoryBox> {
    vec![
        CategoryBox::new(
            "DÓNDE GANAMOS\n(Focos)",
            "• Internacionalización\n(Perú/Arg)\n\n• Mercado Contratistas\n\n• Bioseal Selectivo\n(Alto Potencial)",
            Rgb::hex(BOX_ACCENTS[0]),
            (0.5, 0.5),
            (3.5, 4.0),
        ),
        CategoryBox::new(
            "QUÉ NO HACEMOS\n(Renuncias)",
            "❌ Diversificación\nNo Core\n\n(Foco total en Escala)",
            Rgb::hex(BOX_ACCENTS[1]),
            (4.5, 0.5),
            (3.0, 4.0),
        )
        .with_body_font_size(11.0),
        CategoryBox::new(
            "MANDATO A PGX\n(La Respuesta)",
            "✓ Roadmap con Responsables\n\n✓ Plan de Capacidades\n(Tech + People)\n\n✓ Sistema de Gobierno",
            Rgb::hex(BOX_ACCENTS[2]),
            (8.0, 0.5),
            (3.5, 4.0),
        ),
    ]
}

fn builtin_revenue() -> TrendSeries {
    TrendSeries::new(vec![
        TimeSeriesPoint::new("2026", 10.4),
        TimeSeriesPoint::new("2027", 16.0),
        TimeSeriesPoint::new("2028", 20.0),
    ])
    .with_y_range(Some((5.0, 24.0)))
    .with_label_affixes("$", "MM")
}

const BOX_ACCENTS: [&str; 3] = ["#10b981", "#ef4444", "#f59e0b"];

const MILESTONES: [(&str, (i32, u32, u32), &str); 6] = [
    ("Caja 13 Semanas", (2026, 2, 15), "#3b82f6"),
    ("Estándar HSEC", (2026, 3, 1), "#f97316"),
    ("Director Comercial", (2026, 3, 30), "#22c55e"),
    ("Data Pack V1", (2026, 4, 15), "#a855f7"),
    ("Oferta Premium", (2026, 5, 1), "#ef4444"),
    ("Roadmap Producto", (2026, 11, 15), "#06b6d4"),
];

fn builtin_milestones() -> Vec<Milestone> {
    MILESTONES
        .iter()
        .map(|&(label, (y, m, d), color)| {
            // Literal table above; covered by `builtin_content_matches_the_report`.
            let date = NaiveDate::from_ymd_opt(y, m, d).expect("built-in milestone date is valid");
            Milestone::new(label, date, Rgb::hex(color))
        })
        .collect()
}

fn builtin_deck() -> DeckTemplate {
    let variables = [
        ("client", "CASIA"),
        ("horizon", "2026-2028"),
        ("foundation_year", "2026"),
        ("board_month", "Noviembre"),
        ("gold", "#f59e0b"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v.to_owned()))
    .collect();

    let cover = Slide {
        kicker: Some("SESIÓN DE VALIDACIÓN".to_owned()),
        title: Some("SISTEMA DE GESTIÓN".to_owned()),
        subtitle: Some("{{client}} {{horizon}}".to_owned()),
        blocks: vec![Block::Card {
            heading: None,
            body: vec![Block::paragraph(
                "\"No venimos a ver números. Venimos a aprobar la **forma de gobernar** el escalamiento.\"",
            )],
            inline: true,
        }],
        ..Slide::default()
    };

    let mandate = Slide {
        heading: Some("1. El Mandato ({{board_month}})".to_owned()),
        blocks: vec![
            Block::small_paragraph(
                "Antes de ver el plan, confirmemos que responde a lo que pidió el Directorio.",
                "0.8em",
            ),
            Block::Chart {
                chart: ChartKind::Alignment,
                fragment: true,
                height: None,
            },
            Block::decision(
                "[color={{gold}}]{**CHECK 1:**} ¿Estamos de acuerdo que este plan debe responder a estos 3 mandatos?",
            ),
        ],
        ..Slide::default()
    };

    let reporting = Slide {
        heading: Some("2. El Estándar de Reporte".to_owned()),
        blocks: vec![
            Block::Grid {
                columns: 2,
                items: vec![
                    Block::Card {
                        heading: None,
                        body: vec![
                            Block::paragraph("Del Directorio a la Operación:"),
                            Block::List {
                                items: vec![
                                    "🎯 **OBJETIVO** (Estrategia)".to_owned(),
                                    "⬇".to_owned(),
                                    "📊 **KPI** (Medición)".to_owned(),
                                    "⬇".to_owned(),
                                    "🚀 **INICIATIVA** (Proyecto)".to_owned(),
                                ],
                                bare: true,
                                size: None,
                            },
                        ],
                        inline: false,
                    },
                    Block::Card {
                        heading: None,
                        body: vec![
                            Block::small_paragraph("Ejemplo del Artefacto Visual:", "0.6em"),
                            Block::chart(ChartKind::Timeline),
                        ],
                        inline: false,
                    },
                ],
            },
            Block::decision(
                "[color={{gold}}]{**DECISIÓN 2:**} ¿Aprobamos este formato como el oficial para {{foundation_year}}?",
            ),
        ],
        ..Slide::default()
    };

    let priority_card = |icon: &str, title: &str, caption: &str| Block::Card {
        heading: None,
        body: vec![
            Block::paragraph(format!("{icon} **{title}**")),
            Block::small_paragraph(caption, "0.7em"),
        ],
        inline: false,
    };
    let priorities = Slide {
        heading: Some("3. Prioridades \"Sagradas\"".to_owned()),
        blocks: vec![
            Block::paragraph(
                "Para asegurar la **Fundación {{foundation_year}}**, blindamos estos 3 frentes:",
            ),
            Block::Grid {
                columns: 3,
                items: vec![
                    priority_card("💰", "FINANZAS", "Caja 13 Semanas"),
                    priority_card("⚙️", "OPS", "Estándar HSEC"),
                    priority_card("👥", "TALENTO", "Dir. Comercial"),
                ],
            },
            Block::Chart {
                chart: ChartKind::Trend,
                fragment: true,
                height: Some("150px".to_owned()),
            },
        ],
        ..Slide::default()
    };

    let role_card = |heading: &str, items: [&str; 3]| Block::Card {
        heading: Some(heading.to_owned()),
        body: vec![Block::List {
            items: items.iter().map(|item| (*item).to_owned()).collect(),
            bare: false,
            size: None,
        }],
        inline: false,
    };
    let roles = Slide {
        heading: Some("4. El Mandato".to_owned()),
        blocks: vec![
            Block::Grid {
                columns: 2,
                items: vec![
                    role_card(
                        "Rol Consultor (Yo)",
                        [
                            "Instalar la PMO liviana.",
                            "Perseguir entregables.",
                            "Levantar alertas rojas.",
                        ],
                    ),
                    role_card(
                        "Rol Gerente General",
                        [
                            "Validar a los Responsables.",
                            "Exigir el formato estándar.",
                            "Liderar comité mensual.",
                        ],
                    ),
                ],
            },
            Block::Decision {
                text: "[color={{gold}}]{**DECISIÓN FINAL:**}\n\"¿Tengo luz verde para instalar este sistema el lunes?\""
                    .to_owned(),
                centered: true,
            },
        ],
        ..Slide::default()
    };

    DeckTemplate {
        lang: "es".to_owned(),
        title: "Sesión Validación {{client}}".to_owned(),
        variables,
        theme: DeckTheme::default(),
        slides: vec![cover, mandate, reporting, priorities, roles],
    }
}
