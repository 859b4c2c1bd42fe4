/// Validate that the pipeline is properly configured
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating complete pipeline configuration");

    crate::logging::config::validate_config()?;

    crate::lexical::init_lexical_analysis_logging()?;

    crate::syntax::init_syntax_logging()?;

    crate::log_success!(
        crate::logging::codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Complete pipeline validation succeeded",
        "stages_validated" => 2,
        "lexical_analysis" => true,
        "syntax_analysis" => true
    );

    Ok(())
}
