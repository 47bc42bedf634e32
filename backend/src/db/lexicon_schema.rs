// Mirrors schema/lexicon.sql

diesel::table! {
    lexical_reference_texts (id) {
        id -> Integer,
        name -> Text,
        version -> Text,
    }
}

diesel::table! {
    languages (id) {
        id -> Integer,
        code -> Text,
    }
}

diesel::table! {
    entries (id) {
        id -> Integer,
        reference_text_id -> Integer,
        language_id -> Integer,
        entry_code -> Text,
        lemma -> Text,
    }
}

diesel::table! {
    senses (id) {
        id -> Integer,
        entry_id -> Integer,
        sense_code -> Text,
        definition -> Nullable<Text>,
    }
}

diesel::table! {
    glosses (id) {
        id -> Integer,
        sense_id -> Integer,
        position -> Integer,
        gloss -> Text,
    }
}

diesel::table! {
    strong_codes (id) {
        id -> Integer,
        entry_id -> Integer,
        code -> Text,
    }
}

diesel::table! {
    corpora (id) {
        id -> Integer,
        name -> Text,
    }
}

diesel::table! {
    taxonomies (id) {
        id -> Integer,
        reference_text_id -> Integer,
        name -> Text,
    }
}

diesel::table! {
    taxonomy_domains (id) {
        id -> Integer,
        taxonomy_id -> Integer,
        parent_id -> Nullable<Integer>,
        code -> Text,
    }
}

diesel::table! {
    taxonomy_domain_labels (id) {
        id -> Integer,
        domain_id -> Integer,
        language_id -> Integer,
        label -> Text,
    }
}

diesel::table! {
    entry_occurrences (id) {
        id -> Integer,
        entry_id -> Integer,
        corpus_id -> Integer,
        book -> Integer,
        chapter -> Integer,
        verse -> Integer,
        word -> Integer,
        reference -> Text,
    }
}

diesel::table! {
    sense_occurrences (id) {
        id -> Integer,
        sense_id -> Integer,
        corpus_id -> Integer,
        book -> Integer,
        chapter -> Integer,
        verse -> Integer,
        word -> Integer,
        reference -> Text,
    }
}

diesel::table! {
    entry_domains (id) {
        id -> Integer,
        entry_id -> Integer,
        domain_id -> Integer,
    }
}

diesel::table! {
    sense_domains (id) {
        id -> Integer,
        sense_id -> Integer,
        domain_id -> Integer,
    }
}

diesel::joinable!(entries -> lexical_reference_texts (reference_text_id));
diesel::joinable!(entries -> languages (language_id));
diesel::joinable!(senses -> entries (entry_id));
diesel::joinable!(glosses -> senses (sense_id));
diesel::joinable!(strong_codes -> entries (entry_id));
diesel::joinable!(taxonomies -> lexical_reference_texts (reference_text_id));
diesel::joinable!(taxonomy_domains -> taxonomies (taxonomy_id));
diesel::joinable!(taxonomy_domain_labels -> taxonomy_domains (domain_id));
diesel::joinable!(taxonomy_domain_labels -> languages (language_id));
diesel::joinable!(entry_occurrences -> entries (entry_id));
diesel::joinable!(entry_occurrences -> corpora (corpus_id));
diesel::joinable!(sense_occurrences -> senses (sense_id));
diesel::joinable!(sense_occurrences -> corpora (corpus_id));
diesel::joinable!(entry_domains -> entries (entry_id));
diesel::joinable!(entry_domains -> taxonomy_domains (domain_id));
diesel::joinable!(sense_domains -> senses (sense_id));
diesel::joinable!(sense_domains -> taxonomy_domains (domain_id));

diesel::allow_tables_to_appear_in_same_query!(
    lexical_reference_texts,
    languages,
    entries,
    senses,
    glosses,
    strong_codes,
    corpora,
    taxonomies,
    taxonomy_domains,
    taxonomy_domain_labels,
    entry_occurrences,
    sense_occurrences,
    entry_domains,
    sense_domains,
);
