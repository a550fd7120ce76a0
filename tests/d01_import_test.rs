// ==========================================
// Tests d'import de fichier D01
// ==========================================
// Responsabilité: analyse de bout en bout d'un fichier d'échange
// cadastral, y compris la lecture depuis le disque
// ==========================================

#[cfg(test)]
mod d01_import_test {
    use prise_mandat::importer::{ImportError, DEFAULT_CADASTRE, OPERATION_TYPE_REMPLACEMENT};
    use prise_mandat::D01Parser;
    use std::io::Write;
    use tempfile::TempDir;

    const SAMPLE: &[u8] = b"LO;123456\nSU;;05;20230115\nCO;010030;R07;456;O\nCO;999999;R02;789;N\n";

    #[test]
    fn test_full_file_round_trip() {
        let parsed = D01Parser::new().parse(SAMPLE).unwrap();

        assert_eq!(parsed.lot_number, "123456");
        assert_eq!(parsed.land_registry_district, "05");
        assert_eq!(parsed.bpd_date, "2023-01-15");
        assert_eq!(parsed.operation_type, OPERATION_TYPE_REMPLACEMENT);
        assert_eq!(parsed.cadastre, DEFAULT_CADASTRE);
        assert!(!parsed.is_empty());

        assert_eq!(parsed.concordances.len(), 2);

        let first = &parsed.concordances[0];
        assert_eq!(first.land_registry_district, "05");
        assert_eq!(first.cadastre, "Île-du-Cap-aux-Meules");
        assert_eq!(first.rang, "Rang 7");
        assert_eq!(first.lot_number, "456");
        assert!(first.is_partial);

        // Code de cadastre inconnu: conservé tel quel
        let second = &parsed.concordances[1];
        assert_eq!(second.cadastre, "999999");
        assert_eq!(second.rang, "Rang 2");
        assert!(!second.is_partial);
    }

    #[test]
    fn test_empty_input_yields_empty_record() {
        let parsed = D01Parser::new().parse(b"").unwrap();
        assert_eq!(parsed.lot_number, "");
        assert!(parsed.concordances.is_empty());
        // Même vide, l'enregistrement porte les constantes du format
        assert_eq!(parsed.operation_type, OPERATION_TYPE_REMPLACEMENT);
        assert_eq!(parsed.cadastre, DEFAULT_CADASTRE);
    }

    #[test]
    fn test_unreadable_bytes_block_the_import() {
        let input = [0x53, 0x55, 0x3b, 0xc3, 0x28];
        let err = D01Parser::new().parse(&input).unwrap_err();
        assert!(matches!(err, ImportError::UnreadableInput(_)));
    }

    #[test]
    fn test_parse_file_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lot.d01");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(SAMPLE)
            .unwrap();

        let parsed = D01Parser::new().parse_file(&path).unwrap();
        assert_eq!(parsed.lot_number, "123456");
        assert_eq!(parsed.concordances.len(), 2);
    }

    #[test]
    fn test_parse_file_rejects_other_extensions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lot.txt");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(SAMPLE)
            .unwrap();

        let err = D01Parser::new().parse_file(&path).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_parse_file_missing_path() {
        let err = D01Parser::new().parse_file("/nulle/part/lot.d01").unwrap_err();
        assert!(matches!(err, ImportError::FileNotFound(_)));
    }
}
