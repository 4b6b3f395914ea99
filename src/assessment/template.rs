//! The standard questionnaire shipped with every new assessment.
//!
//! Also serves as the fallback dataset when a stored payload arrives
//! without chapters, so callers never render an empty tree.

use super::domain::{Area, Assessment, Chapter, Requirement};

fn requirement(id: &str, text: &str) -> Requirement {
    Requirement {
        id: id.to_string(),
        text: text.to_string(),
        ..Requirement::default()
    }
}

fn area(id: &str, name: &str, description: &str, requirements: Vec<Requirement>) -> Area {
    Area {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        requirements,
        ..Area::default()
    }
}

fn chapter(id: &str, name: &str, description: &str, areas: Vec<Area>) -> Chapter {
    Chapter {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        areas,
    }
}

/// Build the standard RODO questionnaire with every requirement unanswered.
pub fn standard_template() -> Assessment {
    Assessment {
        chapters: standard_chapters(),
        ..Assessment::default()
    }
}

/// Replace a missing or empty chapter tree with the standard one.
pub fn with_fallback_chapters(mut assessment: Assessment) -> Assessment {
    if assessment.chapters.is_empty() {
        assessment.chapters = standard_chapters();
    }
    assessment
}

pub fn standard_chapters() -> Vec<Chapter> {
    vec![
        chapter(
            "ch-1",
            "I. Organizacja systemu ochrony danych osobowych",
            "Role, odpowiedzialności i rozliczalność administratora danych.",
            vec![
                area(
                    "ch-1-a-1",
                    "Role i odpowiedzialności",
                    "Przypisanie i udokumentowanie obowiązków w zakresie ochrony danych.",
                    vec![
                        requirement(
                            "ch-1-a-1-r-1",
                            "Czy określono i udokumentowano role i odpowiedzialności w zakresie ochrony danych osobowych?",
                        ),
                        requirement(
                            "ch-1-a-1-r-2",
                            "Czy ADO wdrożył odpowiednie środki techniczne i organizacyjne, aby przetwarzanie odbywało się zgodnie z RODO?",
                        ),
                    ],
                ),
                area(
                    "ch-1-a-2",
                    "Dokumentacja ochrony danych",
                    "Polityki i procedury przetwarzania danych osobowych.",
                    vec![
                        requirement(
                            "ch-1-a-2-r-1",
                            "Czy organizacja posiada aktualną politykę ochrony danych osobowych?",
                        ),
                        requirement(
                            "ch-1-a-2-r-2",
                            "Czy pracownicy zostali przeszkoleni z zasad ochrony danych osobowych?",
                        ),
                    ],
                ),
            ],
        ),
        chapter(
            "ch-2",
            "II. Prawo do przetwarzania danych osobowych",
            "Podstawy prawne i zgody na przetwarzanie.",
            vec![area(
                "ch-2-a-1",
                "Podstawy prawne przetwarzania",
                "Identyfikacja i dokumentowanie podstaw prawnych.",
                vec![
                    requirement(
                        "ch-2-a-1-r-1",
                        "Czy dla każdego procesu przetwarzania zidentyfikowano podstawę prawną?",
                    ),
                    requirement(
                        "ch-2-a-1-r-2",
                        "Czy w przypadku współadministrowania cele i sposoby przetwarzania zostały określone wspólnie przez wszystkich współadministratorów?",
                    ),
                    requirement(
                        "ch-2-a-1-r-3",
                        "Czy zgody na przetwarzanie danych są zbierane i przechowywane w sposób umożliwiający ich wykazanie?",
                    ),
                ],
            )],
        ),
        chapter(
            "ch-3",
            "III. Realizacja praw osoby, której dane dotyczą",
            "Obsługa żądań podmiotów danych.",
            vec![area(
                "ch-3-a-1",
                "Obsługa żądań podmiotów danych",
                "Procedury realizacji praw dostępu, sprostowania i usunięcia danych.",
                vec![
                    requirement(
                        "ch-3-a-1-r-1",
                        "Czy wdrożono procedurę obsługi żądań osób, których dane dotyczą?",
                    ),
                    requirement(
                        "ch-3-a-1-r-2",
                        "Czy obowiązek informacyjny jest realizowany przy zbieraniu danych?",
                    ),
                ],
            )],
        ),
        chapter(
            "ch-4",
            "IV. Inspektor ochrony danych",
            "Wyznaczenie i umocowanie IOD.",
            vec![area(
                "ch-4-a-1",
                "Status inspektora",
                "Powołanie, zgłoszenie i niezależność inspektora ochrony danych.",
                vec![
                    requirement(
                        "ch-4-a-1-r-1",
                        "Czy organizacja zweryfikowała obowiązek wyznaczenia inspektora ochrony danych?",
                    ),
                    requirement(
                        "ch-4-a-1-r-2",
                        "Czy dane kontaktowe IOD zostały opublikowane i zgłoszone organowi nadzorczemu?",
                    ),
                ],
            )],
        ),
        chapter(
            "ch-5",
            "V. Rejestrowanie czynności przetwarzania",
            "Rejestr czynności i rejestr kategorii czynności.",
            vec![area(
                "ch-5-a-1",
                "Rejestr czynności przetwarzania",
                "Prowadzenie i aktualizacja rejestrów wymaganych przez art. 30 RODO.",
                vec![
                    requirement(
                        "ch-5-a-1-r-1",
                        "Czy organizacja prowadzi rejestr czynności przetwarzania danych osobowych?",
                    ),
                    requirement(
                        "ch-5-a-1-r-2",
                        "Czy rejestr jest aktualizowany przy każdej zmianie procesów przetwarzania?",
                    ),
                ],
            )],
        ),
        chapter(
            "ch-6",
            "VI. Ocena skutków przetwarzania",
            "Analiza ryzyka i ocena skutków dla ochrony danych.",
            vec![area(
                "ch-6-a-1",
                "Analiza ryzyka",
                "Szacowanie ryzyka naruszenia praw i wolności osób fizycznych.",
                vec![
                    requirement(
                        "ch-6-a-1-r-1",
                        "Czy przeprowadzono analizę ryzyka dla procesów przetwarzania danych osobowych?",
                    ),
                    requirement(
                        "ch-6-a-1-r-2",
                        "Czy dla przetwarzań wysokiego ryzyka przeprowadzono ocenę skutków (DPIA)?",
                    ),
                ],
            )],
        ),
        chapter(
            "ch-7",
            "VII. Naruszenia ochrony danych osobowych",
            "Wykrywanie, obsługa i zgłaszanie naruszeń.",
            vec![area(
                "ch-7-a-1",
                "Obsługa naruszeń",
                "Procedura reagowania na incydenty oraz zgłoszenia do organu nadzorczego.",
                vec![
                    requirement(
                        "ch-7-a-1-r-1",
                        "Czy wdrożono procedurę wykrywania i obsługi naruszeń ochrony danych?",
                    ),
                    requirement(
                        "ch-7-a-1-r-2",
                        "Czy naruszenia są zgłaszane organowi nadzorczemu w terminie 72 godzin?",
                    ),
                    requirement(
                        "ch-7-a-1-r-3",
                        "Czy prowadzona jest wewnętrzna ewidencja naruszeń?",
                    ),
                ],
            )],
        ),
    ]
}
