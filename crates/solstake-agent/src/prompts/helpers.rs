use handlebars::{Context, Handlebars, Helper, Output, RenderContext, RenderError};

/// `{{percent apy}}`: a fraction rendered as a percentage, 0.0712 -> 7.12%
pub fn percent(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> Result<(), RenderError> {
    let value = h
        .param(0)
        .and_then(|p| p.value().as_f64())
        .ok_or_else(|| RenderError::new("percent expects a number"))?;
    out.write(&format!("{:.2}%", value * 100.0))?;
    Ok(())
}

/// `{{sol lamports}}`: lamports rendered as SOL without trailing zeros
pub fn sol(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> Result<(), RenderError> {
    let lamports = h
        .param(0)
        .and_then(|p| p.value().as_u64())
        .ok_or_else(|| RenderError::new("sol expects lamports"))?;
    out.write(&format_sol(lamports))?;
    Ok(())
}

pub(crate) fn format_sol(lamports: u64) -> String {
    let sol = format!("{:.9}", solstake_lib::constants::lamports_to_sol(lamports));
    sol.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn register_all(handlebars: &mut Handlebars) {
    handlebars.register_helper("percent", Box::new(percent));
    handlebars.register_helper("sol", Box::new(sol));
}
