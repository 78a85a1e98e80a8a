//! Statements issued against the vaccination schema.
//!
//! Table and column names are those of the source database; every selected
//! column is aliased to the names the rest of the crate reads.

/// Column matched by the municipality filter (where the dose was applied).
pub const MUNICIPALITY_COLUMN: &str = "e.municipio";

/// Column matched by the dose filter.
pub const DOSE_COLUMN: &str = "ad.dose_vacina";

/// Column matched by the vaccine filter.
pub const VACCINE_COLUMN: &str = "v.nome";

/// Column matched by the region (state code) filter.
pub const REGION_COLUMN: &str = "e.uf";

/// Application rows with their joined attributes, restricted to a date range.
/// Takes two parameters: first and last day, inclusive. Stored values may
/// carry a time of day, so only their date part is compared.
pub const APPLICATIONS: &str = "SELECT
    ad.id_aplicacao AS application_id,
    ad.data_vacina AS applied_on,
    ad.dose_vacina AS dose,
    ad.local_aplicacao AS site,
    ad.via_administracao AS route,
    ad.lote_vacina AS batch,
    ad.cnes AS establishment_id,
    ad.id_vacina AS vaccine_id,
    ad.id_paciente AS patient_id,
    ad.id_estrategia_vacinacao AS strategy_id,
    p.sexo AS sex,
    p.municipio AS patient_municipality,
    p.uf AS patient_state,
    p.idade AS age,
    p.raca_cor AS race_color,
    v.nome AS vaccine_name,
    e.nome_fantasia AS establishment_name,
    e.municipio AS establishment_municipality,
    e.tipo AS establishment_type,
    e.latitude AS latitude,
    e.longitude AS longitude,
    ev.descricao AS strategy
FROM AplicacaoDose ad
LEFT JOIN Paciente p ON ad.id_paciente = p.id_paciente
LEFT JOIN Vacina v ON ad.id_vacina = v.id
LEFT JOIN Estabelecimento e ON ad.cnes = e.id_cnes
LEFT JOIN EstrategiaVacinacao ev ON ad.id_estrategia_vacinacao = ev.id
WHERE date(ad.data_vacina) BETWEEN ? AND ?";

/// Distinct establishment municipalities. Region predicates are appended
/// to this statement as well.
pub const MUNICIPALITIES: &str =
    "SELECT DISTINCT e.municipio AS value FROM Estabelecimento e WHERE e.municipio IS NOT NULL";

/// Distinct vaccine names.
pub const VACCINE_NAMES: &str =
    "SELECT DISTINCT v.nome AS value FROM Vacina v WHERE v.nome IS NOT NULL";

/// Distinct dose labels.
pub const DOSE_TYPES: &str =
    "SELECT DISTINCT ad.dose_vacina AS value FROM AplicacaoDose ad WHERE ad.dose_vacina IS NOT NULL";

/// Distinct vaccination strategy descriptions.
pub const STRATEGIES: &str =
    "SELECT DISTINCT ev.descricao AS value FROM EstrategiaVacinacao ev WHERE ev.descricao IS NOT NULL";

/// Headline totals over the whole dataset.
pub const OVERVIEW: &str = "SELECT
    (SELECT COUNT(*) FROM AplicacaoDose) AS total_doses,
    (SELECT COUNT(DISTINCT id_paciente) FROM AplicacaoDose) AS unique_patients,
    (SELECT AVG(idade) FROM Paciente) AS average_age";

/// Applications per vaccine, including vaccines never applied.
pub const VACCINE_APPLICATIONS: &str = "SELECT
    v.nome AS vaccine_name,
    COUNT(a.id_aplicacao) AS applications
FROM Vacina v
LEFT JOIN AplicacaoDose a ON v.id = a.id_vacina
GROUP BY v.nome";

/// Establishments applying more doses than the per-establishment mean.
pub const BUSIEST_ESTABLISHMENTS: &str = "SELECT
    e.nome_fantasia AS establishment_name,
    COUNT(a.id_aplicacao) AS applications
FROM Estabelecimento e
JOIN AplicacaoDose a ON e.id_cnes = a.cnes
GROUP BY e.nome_fantasia
HAVING COUNT(a.id_aplicacao) > (
    SELECT COUNT(*) * 1.0 / COUNT(DISTINCT cnes) FROM AplicacaoDose
)";

/// Geolocated establishments with their application totals.
pub const ESTABLISHMENT_LOCATIONS: &str = "SELECT
    e.id_cnes AS establishment_id,
    e.latitude AS latitude,
    e.longitude AS longitude,
    COUNT(a.id_aplicacao) AS applications
FROM AplicacaoDose a
INNER JOIN Estabelecimento e ON a.cnes = e.id_cnes
WHERE e.latitude IS NOT NULL AND e.longitude IS NOT NULL
GROUP BY e.id_cnes, e.latitude, e.longitude
ORDER BY e.id_cnes";

/// Applications to patients older than the bound age, per municipality.
pub const ELDERLY_BY_MUNICIPALITY: &str = "SELECT
    e.municipio AS municipality,
    COUNT(a.id_aplicacao) AS applications
FROM AplicacaoDose a
INNER JOIN Estabelecimento e ON a.cnes = e.id_cnes
WHERE a.id_paciente IN (SELECT id_paciente FROM Paciente WHERE idade > ?)
  AND e.municipio IS NOT NULL
GROUP BY e.municipio";

/// Vaccines applied to patients older than the bound age, excluding the
/// bound placeholder vaccine name.
pub const ELDERLY_VACCINES: &str = "SELECT
    v.nome AS vaccine_name,
    COUNT(a.id_aplicacao) AS applications
FROM AplicacaoDose a
INNER JOIN Vacina v ON a.id_vacina = v.id
WHERE a.id_paciente IN (SELECT id_paciente FROM Paciente WHERE idade > ?)
  AND v.nome <> ?
GROUP BY v.nome";

/// Every application of the oldest patient(s).
pub const OLDEST_PATIENT_APPLICATIONS: &str = "SELECT
    p.id_paciente AS patient_id,
    p.idade AS age,
    p.municipio AS patient_municipality,
    a.data_vacina AS applied_on,
    a.dose_vacina AS dose,
    v.nome AS vaccine_name,
    e.nome_fantasia AS establishment_name
FROM AplicacaoDose a
INNER JOIN Paciente p ON a.id_paciente = p.id_paciente
INNER JOIN Vacina v ON a.id_vacina = v.id
INNER JOIN Estabelecimento e ON a.cnes = e.id_cnes
WHERE p.idade = (SELECT MAX(idade) FROM Paciente)
ORDER BY a.data_vacina, a.id_aplicacao";
