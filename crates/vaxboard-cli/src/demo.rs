//! A small demo dataset for `vaxboard init --demo`.

/// Rows for every table of the schema. Re-running it on a seeded database
/// fails on the primary keys.
pub const DEMO_DATA: &str = "
INSERT INTO Paciente (id_paciente, sexo, municipio, uf, idade, raca_cor) VALUES
    ('P0001', 'F', 'Recife', 'PE', 4, 'Parda'),
    ('P0002', 'M', 'Olinda', 'PE', 17, 'Branca'),
    ('P0003', 'F', 'Recife', 'PE', 34, 'Preta'),
    ('P0004', 'M', 'Jaboatão dos Guararapes', 'PE', 61, 'Parda'),
    ('P0005', 'F', 'Paulista', 'PE', 78, 'Branca'),
    ('P0006', 'M', 'São Paulo', 'SP', 85, 'Amarela'),
    ('P0007', 'F', 'Campinas', 'SP', 52, NULL),
    ('P0008', 'M', 'Recife', 'PE', NULL, 'Parda');

INSERT INTO Fabricante (id, nome) VALUES
    (1, 'Instituto Butantan'),
    (2, 'Fiocruz'),
    (3, 'Pfizer');

INSERT INTO Vacina (id, nome, id_fabricante) VALUES
    (1, 'BCG', 2),
    (2, 'Penta', 2),
    (3, 'Influenza', 1),
    (4, 'Covid-19 Pfizer', 3),
    (5, 'Febre Amarela', 2),
    (6, 'SEM INFORMAÇÃO', NULL);

INSERT INTO Estabelecimento (id_cnes, nome_fantasia, municipio, uf, tipo, latitude, longitude) VALUES
    ('2345678', 'USF Alto do Mandu', 'Recife', 'PE', 'Unidade Básica', -8.0210, -34.9260),
    ('2456789', 'Policlínica Amaury Coutinho', 'Recife', 'PE', 'Policlínica', -8.0330, -34.9070),
    ('2567890', 'UBS Peixinhos', 'Olinda', 'PE', 'Unidade Básica', NULL, NULL),
    ('2678901', 'UBS Sé', 'São Paulo', 'SP', 'Unidade Básica', -23.5500, -46.6330);

INSERT INTO EstrategiaVacinacao (id, descricao) VALUES
    (1, 'Rotina'),
    (2, 'Campanha Indiscriminada'),
    (3, 'Especial');

INSERT INTO AplicacaoDose
    (id_aplicacao, data_vacina, dose_vacina, local_aplicacao, via_administracao, lote_vacina,
     cnes, id_vacina, id_paciente, id_estrategia_vacinacao) VALUES
    ('A0001', '2024-01-03', 'Dose', 'Braço Direito', 'Intradérmica', 'BCG231', '2345678', 1, 'P0001', 1),
    ('A0002', '2024-01-03', '1ª Dose', 'Coxa', 'Intramuscular', 'PEN110', '2345678', 2, 'P0001', 1),
    ('A0003', '2024-01-08', '1ª Dose', 'Deltoide', 'Intramuscular', 'COV501', '2456789', 4, 'P0002', 2),
    ('A0004', '2024-01-15', 'Reforço', 'Deltoide', 'Intramuscular', 'COV502', '2456789', 4, 'P0003', 2),
    ('A0005', '2024-01-15', 'Dose', 'Deltoide', 'Intramuscular', 'INF240', '2345678', 3, 'P0004', 2),
    ('A0006', '2024-01-22', 'Dose', 'Deltoide', 'Intramuscular', 'INF240', '2567890', 3, 'P0005', 2),
    ('A0007', '2024-02-01', '2º Reforço', 'Deltoide', 'Intramuscular', 'COV503', '2678901', 4, 'P0006', 3),
    ('A0008', '2024-02-05', 'Dose', 'Deltoide', 'Subcutânea', 'FA0077', '2678901', 5, 'P0007', 1),
    ('A0009', '2024-02-05', '2ª Dose', 'Coxa', 'Intramuscular', 'PEN111', '2345678', 2, 'P0001', 1),
    ('A0010', '2024-02-12', 'Dose', 'Deltoide', 'Intramuscular', 'SI0001', '2678901', 6, 'P0006', 3),
    ('A0011', '2024-02-20', 'Dose', 'Deltoide', 'Intramuscular', 'INF241', '2456789', 3, 'P0008', 2),
    ('A0012', '2024-03-01', 'Reforço', 'Deltoide', 'Intramuscular', 'COV504', '2345678', 4, 'P0004', 2);
";
