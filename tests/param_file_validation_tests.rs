#[cfg(test)]
mod tests {
    use glob::glob;
    use newton_basins::core::file_io::read_json_params;
    use newton_basins::fractals::newtons_method::{render_layers, NewtonsMethodParams};

    #[test]
    fn test_ensure_all_param_files_can_be_parsed_and_validated() {
        let mut file_count = 0;
        for entry in glob("params/**/*.json").expect("Failed to read glob pattern") {
            let path = entry.unwrap_or_else(|e| panic!("Failed to read path: {:?}", e));
            let params: NewtonsMethodParams = read_json_params(&path)
                .unwrap_or_else(|e| panic!("Failed to parse {:?}: {}", path, e));

            params
                .lattice
                .validate()
                .unwrap_or_else(|e| panic!("Bad lattice in {:?}: {}", path, e));
            params
                .fractal()
                .unwrap_or_else(|e| panic!("Bad fractal in {:?}: {}", path, e));
            assert!(
                params.color_maps.len() >= params.roots.len(),
                "Not enough color maps in {:?}",
                path
            );
            file_count += 1;
        }
        assert!(file_count > 0, "No parameter files found");
    }

    #[test]
    fn test_tiny_param_file_evaluates() {
        let params: NewtonsMethodParams =
            read_json_params("params/newtons_method/two_real_roots_tiny.json").unwrap();
        let grids = params.evaluate().unwrap();
        assert_eq!(grids.shape(), (4, 1));
        let layers = render_layers(&grids, &params.color_maps).unwrap();
        assert_eq!(layers.len(), 2);
    }
}
