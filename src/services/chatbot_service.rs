// src/services/chatbot_service.rs
//
// Assistente da secretaria: encaminha a conversa para a OpenAI com três
// ferramentas (consultar aluno, pedidos e pagamentos por CPF). Quando o
// modelo pede uma ferramenta, resolvemos contra o banco e devolvemos o
// resultado para uma segunda chamada de completions. Turno único, sem
// sessão, sem streaming.

use serde_json::{json, Value};

use crate::{
    clients::openai::{MensagemModelo, OpenAiClient},
    common::error::AppError,
    common::validacao::normalizar_cpf,
    db::{AlunoRepository, PagamentoRepository, PedidoRepository},
    models::chatbot::MensagemChat,
};

const PROMPT_SISTEMA: &str = "Você é o assistente virtual da secretaria da EETAD \
(Escola de Educação Teológica das Assembleias de Deus). Responda em português, \
de forma curta e cordial. Use as ferramentas disponíveis para consultar dados \
de alunos, pedidos de livros e pagamentos quando o aluno informar o CPF. \
Nunca invente dados que as ferramentas não devolveram.";

#[derive(Clone)]
pub struct ChatbotService {
    openai: Option<OpenAiClient>,
    aluno_repo: AlunoRepository,
    pedido_repo: PedidoRepository,
    pagamento_repo: PagamentoRepository,
}

impl ChatbotService {
    pub fn new(
        openai: Option<OpenAiClient>,
        aluno_repo: AlunoRepository,
        pedido_repo: PedidoRepository,
        pagamento_repo: PagamentoRepository,
    ) -> Self {
        Self { openai, aluno_repo, pedido_repo, pagamento_repo }
    }

    pub async fn responder(&self, mensagem: &str, historico: &[MensagemChat]) -> Result<String, AppError> {
        let openai = self
            .openai
            .as_ref()
            .ok_or_else(|| AppError::ChatbotError("provedor de IA não configurado".to_string()))?;

        let mut mensagens = vec![json!({ "role": "system", "content": PROMPT_SISTEMA })];
        for turno in historico {
            mensagens.push(json!({
                "role": mapear_papel(&turno.papel),
                "content": turno.conteudo,
            }));
        }
        mensagens.push(json!({ "role": "user", "content": mensagem }));

        let tools = definir_ferramentas();
        let resposta = openai.chat(&mensagens, Some(&tools)).await?;

        if resposta.tool_calls.is_empty() {
            return Ok(resposta
                .content
                .unwrap_or_else(|| "Desculpe, não consegui responder agora.".to_string()));
        }

        // O modelo pediu ferramentas: ecoamos a mensagem dele, executamos
        // cada chamada e fazemos a segunda rodada de completions.
        mensagens.push(mensagem_assistente_com_tools(&resposta));

        for call in &resposta.tool_calls {
            let resultado = self
                .executar_ferramenta(&call.function.name, &call.function.arguments)
                .await;
            mensagens.push(json!({
                "role": "tool",
                "tool_call_id": call.id,
                "content": resultado,
            }));
        }

        let final_msg = openai.chat(&mensagens, None).await?;
        Ok(final_msg
            .content
            .unwrap_or_else(|| "Desculpe, não consegui responder agora.".to_string()))
    }

    async fn executar_ferramenta(&self, nome: &str, argumentos: &str) -> String {
        let Some(cpf) = extrair_cpf(argumentos) else {
            return json!({ "erro": "CPF ausente ou inválido nos argumentos" }).to_string();
        };

        let resultado = match nome {
            "consultar_aluno" => self
                .aluno_repo
                .find_by_cpf(&cpf)
                .await
                .map(|aluno| match aluno {
                    Some(a) => json!({
                        "nome": a.nome,
                        "status": a.status,
                        "cidade": a.cidade,
                        "funcaoIgreja": a.funcao_igreja,
                    }),
                    None => json!({ "erro": "nenhum aluno com este CPF" }),
                }),
            "consultar_pedidos" => self.pedido_repo.find_by_cpf(&cpf).await.map(|pedidos| {
                json!(pedidos
                    .iter()
                    .map(|p| json!({
                        "livro": p.livro,
                        "ciclo": p.ciclo,
                        "status": p.status,
                        "data": p.data_pedido,
                    }))
                    .collect::<Vec<_>>())
            }),
            "consultar_pagamentos" => self.pagamento_repo.find_by_cpf(&cpf).await.map(|pagamentos| {
                json!(pagamentos
                    .iter()
                    .map(|p| json!({
                        "livro": p.livro,
                        "valor": p.valor,
                        "status": p.status,
                    }))
                    .collect::<Vec<_>>())
            }),
            outro => {
                tracing::warn!("Modelo pediu ferramenta desconhecida: {}", outro);
                Ok(json!({ "erro": "ferramenta desconhecida" }))
            }
        };

        match resultado {
            Ok(valor) => valor.to_string(),
            Err(e) => {
                tracing::error!("Falha ao executar ferramenta {}: {}", nome, e);
                json!({ "erro": "falha ao consultar os dados" }).to_string()
            }
        }
    }
}

// "usuario"/"assistente" do front viram os papéis da API.
fn mapear_papel(papel: &str) -> &'static str {
    match papel {
        "assistente" => "assistant",
        _ => "user",
    }
}

fn extrair_cpf(argumentos: &str) -> Option<String> {
    let args: Value = serde_json::from_str(argumentos).ok()?;
    let cpf = normalizar_cpf(args.get("cpf")?.as_str()?);
    if cpf.len() == 11 {
        Some(cpf)
    } else {
        None
    }
}

fn mensagem_assistente_com_tools(resposta: &MensagemModelo) -> Value {
    json!({
        "role": "assistant",
        "content": resposta.content,
        "tool_calls": resposta
            .tool_calls
            .iter()
            .map(|c| json!({
                "id": c.id,
                "type": "function",
                "function": { "name": c.function.name, "arguments": c.function.arguments }
            }))
            .collect::<Vec<_>>(),
    })
}

fn definir_ferramentas() -> Vec<Value> {
    let cpf_schema = json!({
        "type": "object",
        "properties": {
            "cpf": { "type": "string", "description": "CPF do aluno, com ou sem pontuação" }
        },
        "required": ["cpf"]
    });

    vec![
        json!({
            "type": "function",
            "function": {
                "name": "consultar_aluno",
                "description": "Busca a ficha de dados pessoais de um aluno pelo CPF",
                "parameters": cpf_schema.clone(),
            }
        }),
        json!({
            "type": "function",
            "function": {
                "name": "consultar_pedidos",
                "description": "Lista os pedidos de livros de um aluno pelo CPF",
                "parameters": cpf_schema.clone(),
            }
        }),
        json!({
            "type": "function",
            "function": {
                "name": "consultar_pagamentos",
                "description": "Lista os pagamentos de um aluno pelo CPF",
                "parameters": cpf_schema,
            }
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn papel_do_front_vira_papel_da_api() {
        assert_eq!(mapear_papel("assistente"), "assistant");
        assert_eq!(mapear_papel("usuario"), "user");
        assert_eq!(mapear_papel("qualquer coisa"), "user");
    }

    #[test]
    fn extrai_cpf_dos_argumentos() {
        assert_eq!(
            extrair_cpf(r#"{"cpf":"529.982.247-25"}"#),
            Some("52998224725".to_string())
        );
        assert_eq!(extrair_cpf(r#"{"cpf":"123"}"#), None);
        assert_eq!(extrair_cpf(r#"{"outro":"x"}"#), None);
        assert_eq!(extrair_cpf("nao é json"), None);
    }

    #[test]
    fn sao_tres_ferramentas_com_cpf() {
        let tools = definir_ferramentas();
        assert_eq!(tools.len(), 3);
        for tool in &tools {
            let required = &tool["function"]["parameters"]["required"];
            assert_eq!(required, &json!(["cpf"]));
        }
    }
}
