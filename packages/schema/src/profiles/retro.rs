use super::sections::{apply_order, Section};
use super::{identifier_children, part_children, text_body, with_common_attributes};
use crate::profile::Profile;
use crate::registry::ProfileSchema;
use crate::rule::Rule;
use crate::template::Template;
use msdesc_tree::Kind;

const STRUCTURE: &[Kind] = &[Kind::MsDesc, Kind::MsPart];

const SECTIONS: &[Kind] = &[
    Kind::MsIdentifier,
    Kind::Head,
    Kind::History,
    Kind::Additional,
    Kind::MsPart,
];

/// Profile for entries converted from printed catalogues.
///
/// Keeps the identifier and heading of the full profile, carries the
/// converted text as history and literature sections, and has no wrappers.
pub fn retro_description() -> ProfileSchema {
    let mut schema = ProfileSchema::new(Profile::RetroDescription, Kind::MsDesc)
        .with_insert_order(&[
            Kind::MsIdentifier,
            Kind::AltIdentifier,
            Kind::Head,
            Kind::History,
            Kind::Additional,
            Kind::MsPart,
        ])
        .with_rule(Rule::component(Kind::MsDesc).required().components(SECTIONS))
        .with_rule(
            Rule::component(Kind::MsIdentifier)
                .required()
                .containers(STRUCTURE)
                .components(&[Kind::AltIdentifier])
                .default_element(Template::new(Kind::MsIdentifier))
                .default_children(identifier_children()),
        )
        .with_rule(
            Rule::component(Kind::AltIdentifier)
                .many()
                .containers(&[Kind::MsIdentifier])
                .default_element(
                    Template::new(Kind::AltIdentifier).with_attribute("type", "catalog"),
                )
                .default_children(vec![Template::text(Kind::Idno, "")]),
        )
        .with_rule(
            Rule::component(Kind::Head)
                .required()
                .containers(STRUCTURE)
                .default_element(Template::new(Kind::Head))
                .default_children(vec![Template::text(Kind::Title, "")]),
        )
        .with_rule(
            Rule::component(Kind::History)
                .containers(STRUCTURE)
                .default_element(Template::new(Kind::History))
                .default_children(text_body(&[Kind::P])),
        )
        .with_rule(
            Rule::component(Kind::Additional)
                .containers(STRUCTURE)
                .default_element(Template::new(Kind::Additional))
                .default_children(text_body(&[Kind::ListBibl, Kind::Bibl])),
        )
        .with_rule(
            Rule::component(Kind::MsPart)
                .many()
                .containers(STRUCTURE)
                .components(SECTIONS)
                .numbered_at(&[Kind::MsIdentifier, Kind::Idno])
                .default_element(Template::new(Kind::MsPart))
                .default_children(part_children()),
        );

    apply_order(
        &[
            Section::required(Kind::MsIdentifier),
            Section::required(Kind::Head),
            Section::one(Kind::History),
            Section::one(Kind::Additional),
            Section::many(Kind::MsPart),
        ],
        schema.rules_mut(),
    );
    apply_order(&[Section::many(Kind::AltIdentifier)], schema.rules_mut());

    with_common_attributes(schema)
}
