pub const SDBH_LEXICON_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Lexicon>
  <Lexicon_Entry Id="000001000000000" Lemma="אָב" Version="5">
    <StrongCodes><Strong>H0001</Strong></StrongCodes>
    <BaseForms>
      <BaseForm Id="000001001000000">
        <LEXMeanings>
          <LEXMeaning Id="000001001001000" IsBiblicalTerm="Y">
            <LEXDomains><LEXDomain Code="001001">Kinship</LEXDomain></LEXDomains>
            <LEXSubDomains><LEXSubDomain Code="001001001">Parent</LEXSubDomain></LEXSubDomains>
            <LEXCoreDomains><LEXCoreDomain Code="023">Family</LEXCoreDomain></LEXCoreDomains>
            <LEXSenses>
              <LEXSense LanguageCode="en">
                <DefinitionShort>male progenitor</DefinitionShort>
                <Glosses><Gloss>father</Gloss><Gloss>father</Gloss></Glosses>
              </LEXSense>
              <LEXSense LanguageCode="fr">
                <DefinitionShort>géniteur</DefinitionShort>
                <Glosses><Gloss>père</Gloss></Glosses>
              </LEXSense>
            </LEXSenses>
            <CONMeanings>
              <CONMeaning Id="000001001001001">
                <CONDomains><CONDomain Code="002">Lineage</CONDomain></CONDomains>
                <CONReferences>
                  <CONReference>00100200300004</CONReference>
                  <CONReference>00100200300005</CONReference>
                  <CONReference>123</CONReference>
                </CONReferences>
                <CONSenses>
                  <CONSense LanguageCode="en"><Glosses><Gloss>ancestor</Gloss></Glosses></CONSense>
                </CONSenses>
              </CONMeaning>
            </CONMeanings>
          </LEXMeaning>
        </LEXMeanings>
      </BaseForm>
    </BaseForms>
  </Lexicon_Entry>
  <Lexicon_Entry Id="000002000000000" Lemma="אֵב" Version="3">
    <BaseForms>
      <BaseForm Id="000002001000000">
        <LEXMeanings>
          <LEXMeaning Id="000002001001000">
            <LEXDomains><LEXDomain Code="003">Vegetation</LEXDomain></LEXDomains>
            <LEXSenses>
              <LEXSense LanguageCode="en"><Glosses><Gloss>bud</Gloss></Glosses></LEXSense>
            </LEXSenses>
            <CONMeanings>
              <CONMeaning Id="000002001001001">
                <CONSenses>
                  <CONSense LanguageCode="en"><Glosses><Gloss>shoot</Gloss></Glosses></CONSense>
                </CONSenses>
              </CONMeaning>
            </CONMeanings>
          </LEXMeaning>
        </LEXMeanings>
      </BaseForm>
    </BaseForms>
  </Lexicon_Entry>
  <Lexicon_Entry Id="000003000000000" Lemma="אבד" Version="2">
    <BaseForms>
      <BaseForm Id="000003001000000">
        <LEXMeanings>
          <LEXMeaning Id="000003001001000">
            <LEXSenses><LEXSense LanguageCode="en"><Glosses><Gloss>perish</Gloss></Glosses></LEXSense></LEXSenses>
          </LEXMeaning>
        </LEXMeanings>
      </BaseForm>
    </BaseForms>
  </Lexicon_Entry>
  <Lexicon_Entry Id="000004000000000" Version="5"/>
</Lexicon>
"#;

pub const SDBG_LEXICON_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Lexicon>
  <Lexicon_Entry Id="003056000000000" Lemma="λόγος" Version="0">
    <StrongCodes><Strong>G3056</Strong></StrongCodes>
    <BaseForms>
      <BaseForm Id="003056001000000">
        <LEXMeanings>
          <LEXMeaning Id="003056001001000" IsBiblicalTerm="Y">
            <LEXDomains><LEXDomain Code="033006">Word</LEXDomain></LEXDomains>
            <LEXSenses>
              <LEXSense LanguageCode="en">
                <DefinitionShort>that which is said</DefinitionShort>
                <Glosses><Gloss>word</Gloss><Gloss>saying</Gloss></Glosses>
              </LEXSense>
            </LEXSenses>
          </LEXMeaning>
          <LEXMeaning Id="003056001002000" IsBiblicalTerm="N">
            <LEXSenses>
              <LEXSense LanguageCode="en"><Glosses><Gloss>ratio</Gloss></Glosses></LEXSense>
            </LEXSenses>
          </LEXMeaning>
          <LEXMeaning Id="003056001003000" IsBiblicalTerm="Y">
            <LEXSenses>
              <LEXSense LanguageCode="en">
                <DefinitionShort>an account</DefinitionShort>
                <Glosses><Gloss>account</Gloss></Glosses>
              </LEXSense>
            </LEXSenses>
          </LEXMeaning>
        </LEXMeanings>
      </BaseForm>
    </BaseForms>
  </Lexicon_Entry>
</Lexicon>
"#;

pub const SDBH_DOMAINS_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<SemanticDomains Dictionary="SDBH" MeaningType="LEX">
  <SemanticDomain Code="001" Level="1" HasSubDomains="true">
    <SemanticDomainLocalizations>
      <SemanticDomainLocalization LanguageCode="en"><Label>Objects</Label></SemanticDomainLocalization>
      <SemanticDomainLocalization LanguageCode="fr"><Label>Objets</Label></SemanticDomainLocalization>
    </SemanticDomainLocalizations>
  </SemanticDomain>
  <SemanticDomain Code="001001" Level="2" HasSubDomains="true">
    <SemanticDomainLocalizations>
      <SemanticDomainLocalization LanguageCode="en"><Label>Kinship</Label></SemanticDomainLocalization>
    </SemanticDomainLocalizations>
  </SemanticDomain>
  <SemanticDomain Code="001001001" Level="3" HasSubDomains="false">
    <SemanticDomainLocalizations>
      <SemanticDomainLocalization LanguageCode="en"><Label>Parent</Label></SemanticDomainLocalization>
    </SemanticDomainLocalizations>
  </SemanticDomain>
  <SemanticDomain Code="001002" Level="2" HasSubDomains="false">
    <SemanticDomainLocalizations>
      <SemanticDomainLocalization LanguageCode="en"><Label>Tools</Label></SemanticDomainLocalization>
    </SemanticDomainLocalizations>
  </SemanticDomain>
  <SemanticDomain Code="001002001" Level="3" HasSubDomains="false">
    <SemanticDomainLocalizations>
      <SemanticDomainLocalization LanguageCode="en"><Label>Orphan of a leaf</Label></SemanticDomainLocalization>
    </SemanticDomainLocalizations>
  </SemanticDomain>
  <SemanticDomain Code="002" Level="1" HasSubDomains="false">
    <SemanticDomainLocalizations>
      <SemanticDomainLocalization LanguageCode="en"><Label>Events</Label></SemanticDomainLocalization>
    </SemanticDomainLocalizations>
  </SemanticDomain>
</SemanticDomains>
"#;

pub const SDBH_LINKS_JSON: &str = r#"[
  { "id": "00100100100002", "lexicalLinks": ["SDBH:אָב:001001", "SDBH:אָב:001001001:ancestor"] },
  { "id": "00100100100004", "lexicalLinks": ["SDBH:אָב:001001"] },
  { "id": "00100100100003", "lexicalLinks": ["SDBH:אָב:001001"] },
  { "id": "0010010010", "lexicalLinks": ["SDBH:אָב:001001"] },
  { "id": "00100100100006", "lexicalLinks": ["SDBG:λόγος:001001", "SDBH:אָב:0010", "SDBH:אָב:002001", "SDBH:אין:001001"] }
]"#;
