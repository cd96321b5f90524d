use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    Bool,
    /// `YYYY-MM-DD` in the draft, full ISO-8601 timestamp on the wire.
    Date,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub draft: &'static str,
    pub wire: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Lookup category used to populate the select for this field.
    pub lookup: Option<&'static str>,
    pub default_on: bool,
}

impl FieldSpec {
    const fn new(draft: &'static str, wire: &'static str, kind: FieldKind) -> Self {
        Self {
            draft,
            wire,
            kind,
            required: false,
            lookup: None,
            default_on: false,
        }
    }

    pub const fn text(draft: &'static str, wire: &'static str) -> Self {
        Self::new(draft, wire, FieldKind::Text)
    }

    pub const fn integer(draft: &'static str, wire: &'static str) -> Self {
        Self::new(draft, wire, FieldKind::Integer)
    }

    pub const fn decimal(draft: &'static str, wire: &'static str) -> Self {
        Self::new(draft, wire, FieldKind::Decimal)
    }

    pub const fn flag(draft: &'static str, wire: &'static str) -> Self {
        Self::new(draft, wire, FieldKind::Bool)
    }

    pub const fn date(draft: &'static str, wire: &'static str) -> Self {
        Self::new(draft, wire, FieldKind::Date)
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn lookup(mut self, category: &'static str) -> Self {
        self.lookup = Some(category);
        self
    }

    pub const fn on_by_default(mut self) -> Self {
        self.default_on = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterJoin {
    /// Field values joined with a single space, e.g. first + last name.
    Concat,
    /// Matches when any one of the fields contains the term.
    AnyOf,
}

#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    pub key: &'static str,
    pub fields: &'static [&'static str],
    pub join: FilterJoin,
}

impl FilterSpec {
    pub const fn column(key: &'static str, field: &'static [&'static str]) -> Self {
        Self {
            key,
            fields: field,
            join: FilterJoin::Concat,
        }
    }

    pub const fn any_of(key: &'static str, fields: &'static [&'static str]) -> Self {
        Self {
            key,
            fields,
            join: FilterJoin::AnyOf,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Fee,
    FeeStructure,
    Student,
    Teacher,
    GenericLookup,
    StudentLookup,
    Login,
}

impl Endpoint {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Fee => "School/fee",
            Self::FeeStructure => "School/feestructure",
            Self::Student => "School/student",
            Self::Teacher => "School/teacher",
            Self::GenericLookup => "School/GenericDropDown",
            Self::StudentLookup => "School/StudentDropDowns",
            Self::Login => "Hostel/login",
        }
    }
}

#[derive(Debug)]
pub struct EntitySchema {
    /// Screen key used in IPC method names (`fees.save`, ...).
    pub screen: &'static str,
    pub label: &'static str,
    pub endpoint: Endpoint,
    pub lookups: Option<Endpoint>,
    pub id_wire: &'static str,
    pub fields: &'static [FieldSpec],
    pub filters: &'static [FilterSpec],
    pub required_message: &'static str,
    pub fetch_error: &'static str,
    pub toast_ttl: Duration,
    pub close_delay: Duration,
}

impl EntitySchema {
    pub fn field(&self, draft_name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.draft == draft_name)
    }

    pub fn filter(&self, key: &str) -> Option<&FilterSpec> {
        self.filters.iter().find(|f| f.key == key)
    }

    pub fn lookup_fields(&self) -> impl Iterator<Item = (&FieldSpec, &'static str)> {
        self.fields
            .iter()
            .filter_map(|f| f.lookup.map(|category| (f, category)))
    }
}
