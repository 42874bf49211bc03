/// Description of the simulated model. Supplied by the caller, never derived
/// from the data; it only ends up in titles and output file names.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub name: String,
    /// initial condition as text, e.g. `10sin(x)`
    pub initial_condition: String,
    /// diffusion coefficient
    pub alpha: f64,
}

impl Default for ModelInfo {
    fn default() -> Self {
        ModelInfo {
            name: "Laplace".to_string(),
            initial_condition: "10sin(x)".to_string(),
            alpha: 0.1,
        }
    }
}

impl ModelInfo {
    pub fn static_title(&self) -> String {
        format!(
            "1D {} equation, y(0)={}, \u{3b1}={}",
            self.name, self.initial_condition, self.alpha
        )
    }

    pub fn frame_title(&self, t: f64) -> String {
        format!("{} 2D, \u{3b1}={}, t={}[s]", self.name, self.alpha, t)
    }

    fn file_stem(&self, suffix: &str) -> String {
        let stem: String = self
            .name
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
            .collect();
        format!("{} {}", stem.trim(), suffix)
    }

    /// deterministic name of the animation artifact
    pub fn gif_file_name(&self) -> String {
        format!("{}.gif", self.file_stem("2d"))
    }

    pub fn png_file_name(&self) -> String {
        format!("{}.png", self.file_stem("1d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles() {
        let m = ModelInfo::default();
        assert_eq!(m.static_title(), "1D Laplace equation, y(0)=10sin(x), α=0.1");
        assert_eq!(m.frame_title(0.05), "Laplace 2D, α=0.1, t=0.05[s]");
    }

    #[test]
    fn test_file_names_are_deterministic() {
        let m = ModelInfo::default();
        assert_eq!(m.gif_file_name(), "Laplace 2d.gif");
        assert_eq!(m.gif_file_name(), m.gif_file_name());
        assert_eq!(m.png_file_name(), "Laplace 1d.png");
        let odd = ModelInfo {
            name: "heat/diffusion".to_string(),
            ..ModelInfo::default()
        };
        assert_eq!(odd.gif_file_name(), "heat_diffusion 2d.gif");
    }
}
