//! Every spoken phrase in one place, pt-BR, SSML-fragment safe.

use crate::domain::LocationHit;

pub const BOAS_VINDAS: &str = "Olá! Para incluir no estoque, diga o nome do material.";
pub const PERGUNTA_MATERIAL: &str = "Qual o nome do material?";
pub const QUANTIDADE_INVALIDA: &str =
    "Quantidade inválida. Diga um número inteiro maior que zero.";
pub const SETOR_INVALIDO: &str = "Setor inválido. Diga o número do setor.";
pub const ERRO_GRAVACAO: &str = "Desculpe, ocorreu um erro ao gravar os dados.";
pub const RECOMECO: &str = "Ok, operação cancelada. Qual o nome do material?";
pub const DESPEDIDA: &str = "Ok, até a próxima!";
pub const NAO_ENTENDI: &str = "Desculpe, não entendi o pedido.";

pub const MATERIAL_NAO_ENTENDIDO: &str = "Não entendi o material. Pode repetir?";
pub const MATERIAL_NAO_ENCONTRADO: &str = "Desculpe, não encontrei esse material no sistema.";
pub const ERRO_BUSCA: &str = "Ocorreu um erro ao buscar o material.";
pub const BUSCAR_OUTRO: &str = "<break time='0.5s'/> Deseja buscar outro material?";

pub const REQUISICAO_INVALIDA: &str = "Requisição inválida.";
pub const REQUISICAO_NAO_SUPORTADA: &str = "Requisição não suportada.";

pub fn pergunta_quantidade(material: &str) -> String {
    format!("Quantas unidades de {material}?")
}

pub fn pergunta_setor(material: &str) -> String {
    format!("Em qual setor fica {material}?")
}

pub fn confirmacao(material: &str, quantidade: i64, setor: i64) -> String {
    format!("Confirmando: {quantidade} unidades de {material} no setor {setor}. Posso gravar?")
}

pub fn sucesso(material: &str, quantidade: i64, setor: i64) -> String {
    format!(
        "Material {material} com quantidade {quantidade} incluído no setor {setor} com sucesso."
    )
}

pub fn resultados_busca(hits: &[LocationHit]) -> String {
    if hits.is_empty() {
        return MATERIAL_NAO_ENCONTRADO.to_string();
    }

    let unidade = if hits.len() > 1 { "itens" } else { "item" };
    let mut speech = format!("Encontrei {} {}: ", hits.len(), unidade);
    for hit in hits {
        match hit.setor {
            Some(setor) => {
                speech.push_str(&format!("{} está no setor {}. <break time='0.5s'/> ", hit.nome, setor));
            }
            None => {
                speech.push_str(&format!("{} está sem setor cadastrado. <break time='0.5s'/> ", hit.nome));
            }
        }
    }
    speech
}
