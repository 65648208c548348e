use super::sections::{apply_order, Section};
use super::{identifier_children, part_children, text_body, with_common_attributes};
use crate::profile::Profile;
use crate::registry::ProfileSchema;
use crate::rule::Rule;
use crate::template::Template;
use msdesc_tree::Kind;

const STRUCTURE: &[Kind] = &[Kind::MsDesc, Kind::MsPart, Kind::MsFrag];

const INSERT_ORDER: &[Kind] = &[
    Kind::MsIdentifier,
    Kind::AltIdentifier,
    Kind::Head,
    Kind::MsItem,
    Kind::ObjectDesc,
    Kind::HandDesc,
    Kind::DecoDesc,
    Kind::MusicNotation,
    Kind::BindingDesc,
    Kind::History,
    Kind::Additional,
    Kind::MsPart,
    Kind::MsFrag,
];

/// Sections of a description, part or fragment in document order
const SECTIONS: &[Kind] = &[
    Kind::MsIdentifier,
    Kind::Head,
    Kind::MsItem,
    Kind::ObjectDesc,
    Kind::HandDesc,
    Kind::DecoDesc,
    Kind::MusicNotation,
    Kind::BindingDesc,
    Kind::History,
    Kind::Additional,
    Kind::MsPart,
    Kind::MsFrag,
];

fn physical(kind: Kind, body: &[Kind]) -> Rule {
    Rule::component(kind)
        .containers(STRUCTURE)
        .wrapped_in(Kind::PhysDesc, STRUCTURE)
        .default_element(Template::new(kind))
        .default_children(text_body(body))
}

/// Full cataloguing profile
pub fn description() -> ProfileSchema {
    let without = |excluded: &[Kind]| -> Vec<Kind> {
        SECTIONS
            .iter()
            .copied()
            .filter(|kind| !excluded.contains(kind))
            .collect()
    };

    let mut schema = ProfileSchema::new(Profile::Description, Kind::MsDesc)
        .with_insert_order(INSERT_ORDER)
        .with_rule(
            Rule::component(Kind::MsDesc)
                .required()
                .components(SECTIONS),
        )
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
                    Template::new(Kind::AltIdentifier).with_attribute("type", "former"),
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
            Rule::component(Kind::MsItem)
                .many()
                .containers(&[Kind::MsDesc, Kind::MsPart, Kind::MsFrag, Kind::MsItem])
                .components(&[Kind::MsItem])
                .wrapped_in(Kind::MsContents, STRUCTURE)
                .default_element(Template::new(Kind::MsItem))
                .default_children(vec![
                    Template::text(Kind::Locus, ""),
                    Template::text(Kind::Author, ""),
                    Template::text(Kind::Title, ""),
                    Template::new(Kind::Note).with_children(vec![Template::text(Kind::P, "")]),
                    Template::text(Kind::TextLang, ""),
                ]),
        )
        .with_rule(physical(Kind::ObjectDesc, &[Kind::P]).attributes(&["form"]))
        .with_rule(physical(Kind::HandDesc, &[Kind::HandNote, Kind::P]).attributes(&["hands"]))
        .with_rule(physical(Kind::DecoDesc, &[Kind::DecoNote, Kind::P]))
        .with_rule(physical(Kind::MusicNotation, &[Kind::P]))
        .with_rule(physical(Kind::BindingDesc, &[Kind::Binding, Kind::P]))
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
                .containers(&[Kind::MsDesc, Kind::MsPart])
                .components(&without(&[Kind::MsFrag]))
                .numbered_at(&[Kind::MsIdentifier, Kind::Idno])
                .default_element(Template::new(Kind::MsPart))
                .default_children(part_children()),
        )
        .with_rule(
            Rule::component(Kind::MsFrag)
                .many()
                .containers(&[Kind::MsDesc])
                .components(&without(&[Kind::MsPart, Kind::MsFrag]))
                .numbered_at(&[Kind::MsIdentifier, Kind::Idno])
                .default_element(Template::new(Kind::MsFrag))
                .default_children(part_children()),
        )
        .with_rule(
            Rule::structural(Kind::MsContents)
                .containers(STRUCTURE)
                .default_element(Template::new(Kind::MsContents)),
        )
        .with_rule(
            Rule::structural(Kind::PhysDesc)
                .containers(STRUCTURE)
                .default_element(Template::new(Kind::PhysDesc)),
        );

    apply_order(
        &[
            Section::required(Kind::MsIdentifier),
            Section::required(Kind::Head),
            Section::many(Kind::MsItem),
            Section::one(Kind::ObjectDesc),
            Section::one(Kind::HandDesc),
            Section::one(Kind::DecoDesc),
            Section::one(Kind::MusicNotation),
            Section::one(Kind::BindingDesc),
            Section::one(Kind::History),
            Section::one(Kind::Additional),
            Section::many(Kind::MsPart).exclusive(1),
            Section::many(Kind::MsFrag).exclusive(1),
        ],
        schema.rules_mut(),
    );
    apply_order(&[Section::many(Kind::AltIdentifier)], schema.rules_mut());

    with_common_attributes(schema)
}
