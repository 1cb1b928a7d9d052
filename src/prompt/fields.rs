//! Field-descriptor tables, one per asset type.
//!
//! Table order is prompt order. A descriptor's `required` flag drives studio
//! validation; its `style` and `role` drive how and where composition
//! renders it.

use super::{AssetType, FieldValues};
use FieldRole::{Background, Brand, Contact, Message, Notes, Tagline};
use FieldStyle::{Block, Plain, Quoted};

pub const COMPANY_NAME: &str = "companyName";
pub const SLOGAN: &str = "slogan";
pub const BACKGROUND: &str = "background";
pub const DESIGN_NOTES: &str = "designNotes";
pub const HEADLINE: &str = "headline";
pub const SUBHEADLINE: &str = "subheadline";
pub const CTA: &str = "cta";
pub const PHONE: &str = "phone";
pub const WEBSITE: &str = "website";
pub const BODY_TEXT: &str = "bodyText";
pub const KEY_POINTS: &str = "keyPoints";
pub const CONTACT: &str = "contact";
pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
pub const JOB_TITLE: &str = "jobTitle";
pub const OFFICE_PHONE: &str = "officePhone";
pub const CELL_PHONE: &str = "cellPhone";
pub const EMAIL: &str = "email";
pub const ADDRESS: &str = "address";
pub const INDUSTRIES: &str = "industries";
pub const AUDIENCES: &str = "audiences";
pub const TONES: &str = "tones";
pub const THEMES: &str = "themes";
pub const STYLES: &str = "styles";
pub const PREFERENCES: &str = "preferences";
pub const HOMEOWNER_NAME: &str = "homeownerName";
pub const PROPERTY_ADDRESS: &str = "propertyAddress";
pub const PHONE_NUMBER: &str = "phoneNumber";
pub const CONTRACTOR_INFO: &str = "contractorInfo";
pub const CLAIMS_INFO: &str = "claimsInfo";
pub const MOTION: &str = "motion";
/// Free-text edit instruction for the image-edit studio (no asset table).
pub const INSTRUCTION: &str = "instruction";

/// How a value is laid out on its prompt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStyle {
    /// `Label: "value"`
    Quoted,
    /// `Label: value`
    Plain,
    /// `Label:` then the value on the following line.
    Block,
}

/// What a field contributes to the design; business cards split on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Brand,
    Tagline,
    Message,
    Contact,
    Background,
    Notes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub style: FieldStyle,
    pub role: FieldRole,
}

const fn field(name: &'static str, label: &'static str, style: FieldStyle, role: FieldRole) -> FieldDescriptor {
    FieldDescriptor { name, label, required: false, style, role }
}

const fn required(name: &'static str, label: &'static str, style: FieldStyle, role: FieldRole) -> FieldDescriptor {
    FieldDescriptor { name, label, required: true, style, role }
}

const COMPANY: FieldDescriptor = required(COMPANY_NAME, "Company Name", Quoted, Brand);
const REQUESTED_BACKGROUND: FieldDescriptor = field(BACKGROUND, "Requested Background", Plain, Background);

const LOGO_FIELDS: &[FieldDescriptor] = &[
    COMPANY,
    field(SLOGAN, "Slogan", Quoted, Tagline),
    REQUESTED_BACKGROUND,
    field(DESIGN_NOTES, "Additional Design Instructions", Plain, Notes),
];

const BUSINESS_CARD_FIELDS: &[FieldDescriptor] = &[
    COMPANY,
    field(SLOGAN, "Slogan", Quoted, Tagline),
    field(FIRST_NAME, "First Name", Plain, Contact),
    field(LAST_NAME, "Last Name", Plain, Contact),
    field(JOB_TITLE, "Title", Plain, Contact),
    field(OFFICE_PHONE, "Office Phone", Plain, Contact),
    field(CELL_PHONE, "Cell Phone", Plain, Contact),
    field(EMAIL, "Email", Plain, Contact),
    field(WEBSITE, "Website", Plain, Contact),
    field(ADDRESS, "Address", Plain, Contact),
    REQUESTED_BACKGROUND,
    field(DESIGN_NOTES, "Additional", Plain, Notes),
];

const YARD_SIGN_FIELDS: &[FieldDescriptor] = &[
    COMPANY,
    field(HEADLINE, "Headline", Quoted, Message),
    field(CTA, "CTA", Quoted, Message),
    field(PHONE, "Phone", Quoted, Contact),
    field(WEBSITE, "Website", Quoted, Contact),
    REQUESTED_BACKGROUND,
    field(DESIGN_NOTES, "Additional", Plain, Notes),
];

const BANNER_FIELDS: &[FieldDescriptor] = &[
    COMPANY,
    field(HEADLINE, "Headline", Quoted, Message),
    field(SUBHEADLINE, "Subheadline", Quoted, Message),
    field(CTA, "CTA", Quoted, Message),
    field(WEBSITE, "Website", Quoted, Contact),
    REQUESTED_BACKGROUND,
    field(DESIGN_NOTES, "Additional", Plain, Notes),
];

const FLYER_FIELDS: &[FieldDescriptor] = &[
    COMPANY,
    field(HEADLINE, "Headline", Quoted, Message),
    field(BODY_TEXT, "Body Text", Quoted, Message),
    field(KEY_POINTS, "Key Points", Plain, Message),
    field(CONTACT, "Contact", Plain, Contact),
    REQUESTED_BACKGROUND,
    field(DESIGN_NOTES, "Additional", Plain, Notes),
];

const SLOGAN_FIELDS: &[FieldDescriptor] = &[
    COMPANY,
    field(INDUSTRIES, "Industries", Plain, Message),
    field(AUDIENCES, "Target Audiences", Plain, Message),
    field(TONES, "Tones", Plain, Message),
    field(THEMES, "Themes", Plain, Message),
    field(STYLES, "Styles", Plain, Message),
    field(PREFERENCES, "Additional Preferences", Plain, Notes),
];

const CLAIM_FIELDS: &[FieldDescriptor] = &[
    field(HOMEOWNER_NAME, "Homeowner Name", Plain, Contact),
    field(PROPERTY_ADDRESS, "Property Address", Plain, Contact),
    field(PHONE_NUMBER, "Phone Number", Plain, Contact),
    field(CONTRACTOR_INFO, "Contractor Information", Plain, Contact),
    field(CLAIMS_INFO, "Claim Details / Description", Block, Message),
];

const VIDEO_FIELDS: &[FieldDescriptor] = &[field(MOTION, "Motion", Plain, Notes)];

#[must_use]
pub fn descriptors(asset: AssetType) -> &'static [FieldDescriptor] {
    match asset {
        AssetType::Logo => LOGO_FIELDS,
        AssetType::BusinessCard => BUSINESS_CARD_FIELDS,
        AssetType::YardSign => YARD_SIGN_FIELDS,
        AssetType::Banner => BANNER_FIELDS,
        AssetType::Flyer => FLYER_FIELDS,
        AssetType::Slogan => SLOGAN_FIELDS,
        AssetType::Claim => CLAIM_FIELDS,
        AssetType::Video => VIDEO_FIELDS,
    }
}

/// Required descriptors whose value is blank.
#[must_use]
pub fn missing_required(asset: AssetType, values: &FieldValues) -> Vec<&'static FieldDescriptor> {
    descriptors(asset)
        .iter()
        .filter(|d| d.required && values.is_blank(d.name))
        .collect()
}

/// Render one labeled line. Values are trimmed; blanks stay as empty
/// values so the line itself is always present.
#[must_use]
pub fn render_line(descriptor: &FieldDescriptor, values: &FieldValues) -> String {
    let value = values.trimmed(descriptor.name);
    match descriptor.style {
        FieldStyle::Quoted => format!("{}: \"{value}\"", descriptor.label),
        FieldStyle::Plain => format!("{}: {value}", descriptor.label),
        FieldStyle::Block => format!("{}:\n{value}", descriptor.label),
    }
}

#[cfg(test)]
#[path = "fields_test.rs"]
mod tests;
