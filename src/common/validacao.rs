// src/common/validacao.rs
//
// Regras de validação próprias do domínio, plugadas no derive do `validator`
// via `custom(function = ...)`.

use validator::ValidationError;

/// Remove pontuação e devolve só os dígitos do CPF.
pub fn normalizar_cpf(cpf: &str) -> String {
    cpf.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Valida o CPF pelos dois dígitos verificadores.
/// Aceita tanto "123.456.789-09" quanto "12345678909".
pub fn validar_cpf(cpf: &str) -> Result<(), ValidationError> {
    let digitos = normalizar_cpf(cpf);

    if digitos.len() != 11 {
        return Err(ValidationError::new("cpf_tamanho")
            .with_message("O CPF deve ter 11 dígitos.".into()));
    }

    // CPFs de dígito repetido (000..., 111..., ...) passam na conta dos
    // verificadores, mas não são válidos.
    let primeiro = digitos.as_bytes()[0];
    if digitos.bytes().all(|b| b == primeiro) {
        return Err(ValidationError::new("cpf_repetido")
            .with_message("CPF inválido.".into()));
    }

    let nums: Vec<u32> = digitos.chars().filter_map(|c| c.to_digit(10)).collect();

    let dv = |tamanho: usize| -> u32 {
        let soma: u32 = nums[..tamanho]
            .iter()
            .enumerate()
            .map(|(i, n)| n * (tamanho as u32 + 1 - i as u32))
            .sum();
        let resto = (soma * 10) % 11;
        if resto == 10 { 0 } else { resto }
    };

    if dv(9) != nums[9] || dv(10) != nums[10] {
        return Err(ValidationError::new("cpf_digito")
            .with_message("CPF inválido.".into()));
    }

    Ok(())
}

/// Política de senha herdada da secretaria: exatamente 6 caracteres
/// alfanuméricos, com pelo menos uma letra e um dígito.
pub fn validar_senha(senha: &str) -> Result<(), ValidationError> {
    let valida = senha.len() == 6
        && senha.chars().all(|c| c.is_ascii_alphanumeric())
        && senha.chars().any(|c| c.is_ascii_alphabetic())
        && senha.chars().any(|c| c.is_ascii_digit());

    if valida {
        Ok(())
    } else {
        Err(ValidationError::new("senha_politica").with_message(
            "A senha deve ter exatamente 6 caracteres alfanuméricos, com ao menos uma letra e um número.".into(),
        ))
    }
}

/// Normaliza um telefone para o formato que a Evolution API espera:
/// só dígitos, prefixado com o DDI 55 quando ausente.
pub fn normalizar_telefone(telefone: &str) -> String {
    let digitos: String = telefone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digitos.starts_with("55") && digitos.len() >= 12 {
        digitos
    } else {
        format!("55{}", digitos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_valido_sem_mascara() {
        assert!(validar_cpf("52998224725").is_ok());
    }

    #[test]
    fn cpf_valido_com_mascara() {
        assert!(validar_cpf("529.982.247-25").is_ok());
    }

    #[test]
    fn cpf_digito_verificador_errado() {
        assert!(validar_cpf("52998224726").is_err());
        assert!(validar_cpf("12345678901").is_err());
    }

    #[test]
    fn cpf_digitos_repetidos() {
        assert!(validar_cpf("00000000000").is_err());
        assert!(validar_cpf("111.111.111-11").is_err());
    }

    #[test]
    fn cpf_malformado() {
        assert!(validar_cpf("").is_err());
        assert!(validar_cpf("123").is_err());
        assert!(validar_cpf("abcdefghijk").is_err());
    }

    #[test]
    fn senha_dentro_da_politica() {
        assert!(validar_senha("abc123").is_ok());
        assert!(validar_senha("1a2b3c").is_ok());
        assert!(validar_senha("A1B2C3").is_ok());
    }

    #[test]
    fn senha_fora_da_politica() {
        // Tamanho errado
        assert!(validar_senha("abc12").is_err());
        assert!(validar_senha("abc1234").is_err());
        // Só letras ou só números
        assert!(validar_senha("abcdef").is_err());
        assert!(validar_senha("123456").is_err());
        // Caractere não alfanumérico
        assert!(validar_senha("ab#123").is_err());
        assert!(validar_senha("").is_err());
    }

    #[test]
    fn telefone_ganha_ddi() {
        assert_eq!(normalizar_telefone("(11) 98888-7777"), "5511988887777");
        assert_eq!(normalizar_telefone("5511988887777"), "5511988887777");
    }
}
