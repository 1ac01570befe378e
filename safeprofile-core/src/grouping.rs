//! Keyword-driven thematic column groups.

use serde::Serialize;

/// A theme and the keywords that pull a column into it.
#[derive(Debug, Clone, Copy)]
pub struct GroupTheme {
    /// Theme name, used as a directory name in reports
    pub name: &'static str,
    /// Upper-case substrings searched in column names
    pub keywords: &'static [&'static str],
}

/// Built-in themes in report order.
pub static GROUP_KEYWORDS: &[GroupTheme] = &[
    GroupTheme {
        name: "demografia",
        keywords: &[
            "EDAD",
            "SEXO",
            "GENERO",
            "ETNIA",
            "ESTADO_CIVIL",
            "ESCOLARIDAD",
            "OCUPACION",
            "NACIONALIDAD",
        ],
    },
    GroupTheme {
        name: "territorial_acceso",
        keywords: &[
            "DEPARTAMENTO",
            "MUNICIPIO",
            "LOCALIDAD",
            "BARRIO",
            "ZONA",
            "DIRECCION",
        ],
    },
    GroupTheme {
        name: "salud_nutricion",
        keywords: &["PESO", "TALLA", "NUTRIC", "GESTACION", "SALUD", "VACUNA"],
    },
    GroupTheme {
        name: "educacion",
        keywords: &["COLEGIO", "GRADO", "ESCOLAR", "INASISTENCIA", "EDUCACION"],
    },
    GroupTheme {
        name: "intervencion",
        keywords: &[
            "INTERVENCION",
            "SEGUIMIENTO",
            "CIERRE",
            "REPOSICION",
            "RESULTADOS",
        ],
    },
    GroupTheme {
        name: "riesgos",
        keywords: &[
            "RIESGO",
            "VIOLENCIA",
            "ABUSO",
            "TRABAJO_INFANTIL",
            "EXPLOTACION",
        ],
    },
];

impl GroupTheme {
    /// True when the upper-cased column name contains any keyword.
    pub fn matches(&self, column: &str) -> bool {
        let upper = column.to_uppercase();
        self.keywords.iter().any(|k| upper.contains(k))
    }
}

/// A non-empty theme with its member columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnGroup {
    /// Theme name
    pub name: String,
    /// Member columns in input order
    pub columns: Vec<String>,
}

/// Ordered groups; a column may belong to several.
pub type GroupMap = Vec<ColumnGroup>;

/// Assigns columns to the built-in themes.
///
/// Themes keep declaration order, members keep input order, and themes
/// without members are omitted.
///
/// ```rust
/// use safeprofile_core::grouping::auto_group_columns;
///
/// let groups = auto_group_columns(&["EDAD_MADRE", "DIRECCION_RESIDENCIA"]);
/// assert_eq!(groups[0].name, "demografia");
/// assert_eq!(groups[0].columns, vec!["EDAD_MADRE"]);
/// assert_eq!(groups[1].name, "territorial_acceso");
/// ```
pub fn auto_group_columns<S: AsRef<str>>(columns: &[S]) -> GroupMap {
    group_columns(GROUP_KEYWORDS, columns)
}

/// Assigns columns to a custom theme table.
pub fn group_columns<S: AsRef<str>>(themes: &[GroupTheme], columns: &[S]) -> GroupMap {
    themes
        .iter()
        .filter_map(|theme| {
            let members: Vec<String> = columns
                .iter()
                .map(AsRef::as_ref)
                .filter(|c| theme.matches(c))
                .map(str::to_string)
                .collect();
            if members.is_empty() {
                None
            } else {
                tracing::debug!("Group '{}': {} columns", theme.name, members.len());
                Some(ColumnGroup {
                    name: theme.name.to_string(),
                    columns: members,
                })
            }
        })
        .collect()
}
